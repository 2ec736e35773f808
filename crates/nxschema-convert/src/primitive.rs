//! The structural conversion primitive

use crate::validator::Validator;
use crate::Result;
use serde_json::Value;

/// Converts a loaded source schema into a plain JSON Schema document.
///
/// The dialect layer in [`NxSchemaConverter`](crate::NxSchemaConverter) only
/// relies on the result being a JSON object with an optional `properties`
/// map; everything else is passed through.
pub trait SchemaPrimitive: Send + Sync {
    fn to_json_schema(&self, source: &Value) -> Result<Value>;
}

/// Primitive for [`Validator`] definitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct ValidatorPrimitive;

impl SchemaPrimitive for ValidatorPrimitive {
    fn to_json_schema(&self, source: &Value) -> Result<Value> {
        Ok(Validator::from_value(source)?.to_json_schema())
    }
}

impl<F> SchemaPrimitive for F
where
    F: Fn(&Value) -> Result<Value> + Send + Sync,
{
    fn to_json_schema(&self, source: &Value) -> Result<Value> {
        self(source)
    }
}

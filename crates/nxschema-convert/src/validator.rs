//! The validator definition format and its JSON Schema rendering
//!
//! Validator definitions are the "source schemas" users write in their schema
//! modules. Each definition is an object tagged by `type`:
//!
//! ```yaml
//! type: object
//! strict: true
//! shape:
//!   name: { type: string, description: Project name }
//!   port: { type: number, int: true, default: 4200 }
//!   command: { type: string, optional: true }
//!   mode: { type: enum, values: [dev, prod] }
//!   target:
//!     type: string
//!     meta: { default: { source: projectName } }
//! ```

use crate::{Error, Result};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// Dialect URI emitted at the top of every rendered schema
pub const JSON_SCHEMA_DRAFT: &str = "https://json-schema.org/draft/2020-12/schema";

/// A validator definition with its common modifiers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Validator {
    #[serde(flatten)]
    pub kind: ValidatorKind,

    /// Field may be omitted from its parent object
    #[serde(default)]
    pub optional: bool,

    /// `null` is accepted in addition to the base type
    #[serde(default)]
    pub nullable: bool,

    #[serde(default)]
    pub default: Option<Value>,

    #[serde(default)]
    pub description: Option<String>,

    /// Extra keys copied verbatim onto the rendered schema
    #[serde(default)]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum ValidatorKind {
    String {
        #[serde(default)]
        min_length: Option<u64>,
        #[serde(default)]
        max_length: Option<u64>,
        #[serde(default)]
        pattern: Option<String>,
        #[serde(default)]
        format: Option<String>,
    },
    Number {
        #[serde(default)]
        int: bool,
        #[serde(default)]
        minimum: Option<f64>,
        #[serde(default)]
        maximum: Option<f64>,
    },
    Boolean,
    Literal {
        value: Value,
    },
    Enum {
        values: Vec<Value>,
    },
    Array {
        items: Box<Validator>,
        #[serde(default)]
        min_items: Option<u64>,
        #[serde(default)]
        max_items: Option<u64>,
    },
    Object {
        #[serde(default)]
        shape: BTreeMap<String, Validator>,
        #[serde(default)]
        strict: bool,
        #[serde(default)]
        catchall: Option<Box<Validator>>,
    },
    Record {
        values: Box<Validator>,
    },
    Union {
        options: Vec<Validator>,
    },
    Any,
    Unknown,
}

impl Validator {
    /// Parse a validator definition from a loaded module export.
    pub fn from_value(value: &Value) -> Result<Self> {
        let validator = Self::deserialize(value).map_err(|e| Error::invalid(e.to_string()))?;
        validator.check("$")?;
        Ok(validator)
    }

    /// Render as a standalone draft 2020-12 JSON Schema document.
    pub fn to_json_schema(&self) -> Value {
        let mut rendered = self.render();
        if let Value::Object(map) = &mut rendered {
            map.insert("$schema".to_string(), json!(JSON_SCHEMA_DRAFT));
        }
        rendered
    }

    /// Whether the parent object lists this field under `required`
    fn is_required(&self) -> bool {
        !self.optional && self.default.is_none()
    }

    fn check(&self, at: &str) -> Result<()> {
        match &self.kind {
            ValidatorKind::Enum { values } if values.is_empty() => {
                Err(Error::invalid(format!("{at}: enum needs at least one value")))
            }
            ValidatorKind::Union { options } if options.is_empty() => {
                Err(Error::invalid(format!("{at}: union needs at least one option")))
            }
            ValidatorKind::Number {
                minimum: Some(min),
                maximum: Some(max),
                ..
            } if min > max => Err(Error::invalid(format!(
                "{at}: minimum {min} is greater than maximum {max}"
            ))),
            ValidatorKind::String {
                min_length: Some(min),
                max_length: Some(max),
                ..
            } if min > max => Err(Error::invalid(format!(
                "{at}: minLength {min} is greater than maxLength {max}"
            ))),
            ValidatorKind::Array { items, .. } => items.check(&format!("{at}[]")),
            ValidatorKind::Record { values } => values.check(&format!("{at}{{}}")),
            ValidatorKind::Union { options } => options
                .iter()
                .enumerate()
                .try_for_each(|(i, option)| option.check(&format!("{at}|{i}"))),
            ValidatorKind::Object {
                shape, catchall, ..
            } => {
                for (key, field) in shape {
                    field.check(&format!("{at}.{key}"))?;
                }
                match catchall {
                    Some(catchall) => catchall.check(&format!("{at}.*")),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }

    fn render(&self) -> Value {
        let base = self.kind.render();
        let mut node = if self.nullable {
            let mut map = Map::new();
            map.insert("anyOf".into(), json!([base, { "type": "null" }]));
            map
        } else {
            match base {
                Value::Object(map) => map,
                _ => Map::new(),
            }
        };

        if let Some(description) = &self.description {
            node.insert("description".into(), json!(description));
        }
        if let Some(default) = &self.default {
            node.insert("default".into(), default.clone());
        }
        for (key, value) in &self.meta {
            node.insert(key.clone(), value.clone());
        }
        Value::Object(node)
    }
}

impl ValidatorKind {
    fn render(&self) -> Value {
        let mut node = Map::new();
        match self {
            Self::String {
                min_length,
                max_length,
                pattern,
                format,
            } => {
                node.insert("type".into(), json!("string"));
                insert_opt(&mut node, "minLength", min_length.map(Value::from));
                insert_opt(&mut node, "maxLength", max_length.map(Value::from));
                insert_opt(&mut node, "pattern", pattern.clone().map(Value::from));
                insert_opt(&mut node, "format", format.clone().map(Value::from));
            }
            Self::Number {
                int,
                minimum,
                maximum,
            } => {
                node.insert(
                    "type".into(),
                    json!(if *int { "integer" } else { "number" }),
                );
                insert_opt(&mut node, "minimum", minimum.map(number));
                insert_opt(&mut node, "maximum", maximum.map(number));
            }
            Self::Boolean => {
                node.insert("type".into(), json!("boolean"));
            }
            Self::Literal { value } => {
                insert_opt(&mut node, "type", primitive_type(value).map(Value::from));
                node.insert("const".into(), value.clone());
            }
            Self::Enum { values } => {
                let first = values.first().and_then(primitive_type);
                if first.is_some() && values.iter().all(|v| primitive_type(v) == first) {
                    insert_opt(&mut node, "type", first.map(Value::from));
                }
                node.insert("enum".into(), Value::Array(values.clone()));
            }
            Self::Array {
                items,
                min_items,
                max_items,
            } => {
                node.insert("type".into(), json!("array"));
                node.insert("items".into(), items.render());
                insert_opt(&mut node, "minItems", min_items.map(Value::from));
                insert_opt(&mut node, "maxItems", max_items.map(Value::from));
            }
            Self::Object {
                shape,
                strict,
                catchall,
            } => {
                node.insert("type".into(), json!("object"));
                let properties: Map<String, Value> = shape
                    .iter()
                    .map(|(key, field)| (key.clone(), field.render()))
                    .collect();
                let required: Vec<Value> = shape
                    .iter()
                    .filter(|(_, field)| field.is_required())
                    .map(|(key, _)| json!(key))
                    .collect();
                node.insert("properties".into(), Value::Object(properties));
                if !required.is_empty() {
                    node.insert("required".into(), Value::Array(required));
                }
                match catchall {
                    Some(catchall) => {
                        node.insert("additionalProperties".into(), catchall.render());
                    }
                    None if *strict => {
                        node.insert("additionalProperties".into(), json!(false));
                    }
                    None => {}
                }
            }
            Self::Record { values } => {
                node.insert("type".into(), json!("object"));
                node.insert("propertyNames".into(), json!({ "type": "string" }));
                node.insert("additionalProperties".into(), values.render());
            }
            Self::Union { options } => {
                let rendered: Vec<Value> = options.iter().map(Validator::render).collect();
                node.insert("anyOf".into(), Value::Array(rendered));
            }
            Self::Any | Self::Unknown => {}
        }
        Value::Object(node)
    }
}

fn insert_opt(node: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        node.insert(key.to_string(), value);
    }
}

/// Integral bounds render as integers so `minimum: 1` stays `1`, not `1.0`.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < (i64::MAX as f64) {
        json!(n as i64)
    } else {
        json!(n)
    }
}

fn primitive_type(value: &Value) -> Option<&'static str> {
    match value {
        Value::String(_) => Some("string"),
        Value::Number(_) => Some("number"),
        Value::Bool(_) => Some("boolean"),
        Value::Null => Some("null"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(value: Value) -> Value {
        Validator::from_value(&value).unwrap().to_json_schema()
    }

    #[test]
    fn test_object_with_required_and_optional_fields() {
        let schema = render(json!({
            "type": "object",
            "shape": {
                "name": { "type": "string" },
                "port": { "type": "number", "int": true, "default": 4200 },
                "verbose": { "type": "boolean", "optional": true }
            }
        }));

        assert_eq!(
            schema,
            json!({
                "$schema": JSON_SCHEMA_DRAFT,
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "port": { "type": "integer", "default": 4200 },
                    "verbose": { "type": "boolean" }
                },
                "required": ["name"]
            })
        );
    }

    #[test]
    fn test_strict_object_disallows_additional_properties() {
        let schema = render(json!({ "type": "object", "strict": true, "shape": {} }));
        assert_eq!(schema["additionalProperties"], json!(false));
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_nullable_wraps_in_any_of() {
        let schema = render(json!({ "type": "string", "nullable": true, "description": "x" }));
        assert_eq!(
            schema,
            json!({
                "$schema": JSON_SCHEMA_DRAFT,
                "anyOf": [{ "type": "string" }, { "type": "null" }],
                "description": "x"
            })
        );
    }

    #[test]
    fn test_enum_and_literal_infer_type() {
        let schema = render(json!({ "type": "enum", "values": ["dev", "prod"] }));
        assert_eq!(schema["type"], "string");
        assert_eq!(schema["enum"], json!(["dev", "prod"]));

        let mixed = render(json!({ "type": "enum", "values": ["a", 1] }));
        assert!(mixed.get("type").is_none());

        let literal = render(json!({ "type": "literal", "value": true }));
        assert_eq!(literal["type"], "boolean");
        assert_eq!(literal["const"], true);
    }

    #[test]
    fn test_meta_keys_are_copied() {
        let schema = render(json!({
            "type": "string",
            "meta": { "x-prompt": "Which project?", "default": { "source": "projectName" } }
        }));
        assert_eq!(schema["x-prompt"], "Which project?");
        assert_eq!(schema["default"], json!({ "source": "projectName" }));
    }

    #[test]
    fn test_number_bounds_stay_integral() {
        let schema = render(json!({ "type": "number", "minimum": 1, "maximum": 2.5 }));
        assert_eq!(schema["minimum"], json!(1));
        assert_eq!(schema["maximum"], json!(2.5));
    }

    #[test]
    fn test_record_and_array() {
        let schema = render(json!({
            "type": "record",
            "values": { "type": "array", "items": { "type": "string" }, "minItems": 1 }
        }));
        assert_eq!(
            schema["additionalProperties"],
            json!({ "type": "array", "items": { "type": "string" }, "minItems": 1 })
        );
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let err = Validator::from_value(&json!({ "type": "date" })).unwrap_err();
        assert!(matches!(err, Error::InvalidValidator { .. }));
    }

    #[test]
    fn test_nested_semantic_errors_name_location() {
        let err = Validator::from_value(&json!({
            "type": "object",
            "shape": { "mode": { "type": "enum", "values": [] } }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("$.mode"), "{err}");
    }
}

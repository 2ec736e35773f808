//! Conversion of validator definitions into build-tool JSON Schema
//!
//! Two layers:
//!
//! - **Primitive** ([`SchemaPrimitive`]): turns a validator definition into a
//!   plain draft 2020-12 JSON Schema. [`ValidatorPrimitive`] implements it for
//!   the [`Validator`] format; other primitives can be plugged in.
//! - **Converter** ([`NxSchemaConverter`]): applies the build-tool dialect on
//!   top of the primitive's output (`$default` metadata, the positional
//!   `command` default, and the fixed `$schema`/`$id`/`title` envelope).
//!
//! # Example
//!
//! ```
//! use nxschema_convert::{NxSchemaConverter, SchemaOptions};
//! use serde_json::json;
//!
//! let validator = json!({
//!     "type": "object",
//!     "shape": { "name": { "type": "string" } }
//! });
//! let schema = NxSchemaConverter::new()
//!     .convert(&validator, &SchemaOptions::new("BuildOptions"))
//!     .unwrap();
//!
//! assert_eq!(schema["$id"], "BuildOptions");
//! assert_eq!(schema["properties"]["name"]["type"], "string");
//! assert_eq!(schema["required"], json!(["name"]));
//! ```

pub mod converter;
pub mod error;
pub mod options;
pub mod primitive;
pub mod validator;

pub use converter::{
    NX_SCHEMA_URI, NxSchemaConverter, apply_command_default, build_nx_schema,
    rename_default_sources,
};
pub use error::{Error, Result};
pub use options::{DefaultSource, SchemaOptions};
pub use primitive::{SchemaPrimitive, ValidatorPrimitive};
pub use validator::{JSON_SCHEMA_DRAFT, Validator, ValidatorKind};

//! Build-tool dialect layer over the conversion primitive

use crate::options::{DefaultSource, SchemaOptions};
use crate::primitive::{SchemaPrimitive, ValidatorPrimitive};
use crate::{Error, Result};
use serde_json::{Map, Value, json};

/// `$schema` URI of every generated document
pub const NX_SCHEMA_URI: &str = "http://json-schema.org/schema";

/// Keys whose values are maps of subschemas
const SCHEMA_MAP_KEYS: &[&str] = &["properties", "$defs", "definitions", "patternProperties"];
/// Keys whose values are arrays of subschemas
const SCHEMA_LIST_KEYS: &[&str] = &["anyOf", "oneOf", "allOf", "prefixItems"];
/// Keys whose values are a single subschema
const SCHEMA_KEYS: &[&str] = &["items", "additionalProperties", "not"];

/// Converts source schemas into the build tool's JSON Schema dialect.
pub struct NxSchemaConverter {
    primitive: Box<dyn SchemaPrimitive>,
}

impl NxSchemaConverter {
    /// Converter backed by [`ValidatorPrimitive`].
    pub fn new() -> Self {
        Self::with_primitive(ValidatorPrimitive)
    }

    pub fn with_primitive(primitive: impl SchemaPrimitive + 'static) -> Self {
        Self {
            primitive: Box::new(primitive),
        }
    }

    /// Convert a loaded source schema into an artifact document.
    ///
    /// Pure: no I/O happens here.
    pub fn convert(&self, source: &Value, options: &SchemaOptions) -> Result<Value> {
        let base = self.primitive.to_json_schema(source)?;
        build_nx_schema(base, options)
    }
}

impl Default for NxSchemaConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a plain JSON Schema in the build-tool envelope.
///
/// Top-level keys other than `properties` pass through, then the envelope
/// keys are set: `$schema`, `$id`, `title`, `type`, `additionalProperties`,
/// `properties` and, when non-empty, `description`. Without a description
/// option the converted schema's own `description` is kept.
pub fn build_nx_schema(base: Value, options: &SchemaOptions) -> Result<Value> {
    let Value::Object(mut rest) = base else {
        return Err(Error::conversion(format!(
            "expected the converted schema to be an object, got {}",
            kind_of(&base)
        )));
    };

    let mut properties = match rest.remove("properties") {
        Some(Value::Object(map)) => map,
        None => Map::new(),
        Some(other) => {
            return Err(Error::conversion(format!(
                "expected `properties` to be an object, got {}",
                kind_of(&other)
            )));
        }
    };

    for definition in properties.values_mut() {
        rename_default_sources(definition);
    }
    for key in ["$defs", "definitions"] {
        if let Some(defs) = rest.get_mut(key) {
            rename_default_sources_in_map(defs);
        }
    }
    if options.effective_command_default() {
        apply_command_default(&mut properties);
    }

    rest.insert("$schema".into(), json!(NX_SCHEMA_URI));
    rest.insert("$id".into(), json!(options.name));
    rest.insert("title".into(), json!(options.effective_title()));
    rest.insert("type".into(), json!("object"));
    rest.insert(
        "additionalProperties".into(),
        json!(options.effective_additional_properties()),
    );
    rest.insert("properties".into(), Value::Object(properties));
    if let Some(description) = options.description.as_deref()
        && !description.is_empty()
    {
        rest.insert("description".into(), json!(description));
    }

    Ok(Value::Object(rest))
}

/// Rewrite `default: { source, index? }` metadata into the dialect's
/// `$default: { $source, index? }` form, recursively through subschemas.
///
/// Only objects whose `source` is a known [`DefaultSource`] and whose other
/// keys are limited to `index` are rewritten; ordinary object defaults are
/// left alone.
pub fn rename_default_sources(schema: &mut Value) {
    let Value::Object(node) = schema else {
        return;
    };

    if let Some(converted) = node.get("default").and_then(as_default_source) {
        node.remove("default");
        node.insert("$default".into(), converted);
    }

    for key in SCHEMA_MAP_KEYS {
        if let Some(children) = node.get_mut(*key) {
            rename_default_sources_in_map(children);
        }
    }
    for key in SCHEMA_LIST_KEYS {
        if let Some(Value::Array(children)) = node.get_mut(*key) {
            children.iter_mut().for_each(rename_default_sources);
        }
    }
    for key in SCHEMA_KEYS {
        if let Some(child) = node.get_mut(*key) {
            rename_default_sources(child);
        }
    }
}

fn rename_default_sources_in_map(children: &mut Value) {
    if let Value::Object(map) = children {
        map.values_mut().for_each(rename_default_sources);
    }
}

fn as_default_source(value: &Value) -> Option<Value> {
    let map = value.as_object()?;
    let source = DefaultSource::parse(map.get("source")?.as_str()?)?;
    if map.keys().any(|k| k != "source" && k != "index") {
        return None;
    }

    let mut converted = Map::new();
    converted.insert("$source".into(), json!(source.as_str()));
    if let Some(index) = map.get("index") {
        converted.insert("index".into(), index.clone());
    }
    Some(Value::Object(converted))
}

/// Make a top-level `command` property default to the first positional
/// argument. Boolean schemas and absent properties are left untouched.
pub fn apply_command_default(properties: &mut Map<String, Value>) {
    if let Some(Value::Object(command)) = properties.get_mut("command") {
        command.insert(
            "$default".into(),
            json!({ "$source": DefaultSource::Argv.as_str(), "index": 0 }),
        );
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

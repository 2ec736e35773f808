//! Loader strategies for the module formats nxschema understands

use serde_json::Value;

/// A strategy that turns module source text into a JSON value.
///
/// Loaders are tried in registration order by the
/// [`ModuleResolver`](crate::ModuleResolver); a loader only needs to report
/// which extensions it claims and how to parse.
pub trait ModuleLoader: Send + Sync {
    /// Short name used in logs and aggregated error messages
    fn name(&self) -> &'static str;

    /// File extensions (lowercase, without the dot) this loader claims
    fn extensions(&self) -> &'static [&'static str];

    /// Parse module source text
    fn parse(&self, source: &str) -> std::result::Result<Value, String>;

    fn claims(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Native JSON modules.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonLoader;

impl ModuleLoader for JsonLoader {
    fn name(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, source: &str) -> std::result::Result<Value, String> {
        serde_json::from_str(source).map_err(|e| e.to_string())
    }
}

/// YAML modules. YAML is a superset of JSON, so this also accepts
/// hand-written JSON with comments or unquoted keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct YamlLoader;

impl ModuleLoader for YamlLoader {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["yaml", "yml"]
    }

    fn parse(&self, source: &str) -> std::result::Result<Value, String> {
        serde_yaml::from_str(source).map_err(|e| e.to_string())
    }
}

/// TOML modules.
#[derive(Debug, Default, Clone, Copy)]
pub struct TomlLoader;

impl ModuleLoader for TomlLoader {
    fn name(&self) -> &'static str {
        "toml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["toml"]
    }

    fn parse(&self, source: &str) -> std::result::Result<Value, String> {
        toml::from_str(source).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loaders_claim_their_extensions() {
        assert!(JsonLoader.claims("json"));
        assert!(JsonLoader.claims("JSON"));
        assert!(YamlLoader.claims("yml"));
        assert!(!YamlLoader.claims("toml"));
        assert!(TomlLoader.claims("toml"));
    }

    #[test]
    fn test_yaml_accepts_json_syntax() {
        let value = YamlLoader.parse(r#"{"default": {"type": "string"}}"#).unwrap();
        assert_eq!(value, json!({"default": {"type": "string"}}));
    }

    #[test]
    fn test_toml_tables_become_objects() {
        let value = TomlLoader
            .parse("[default]\ntype = \"object\"\n\n[default.shape.name]\ntype = \"string\"\n")
            .unwrap();
        assert_eq!(
            value,
            json!({"default": {"type": "object", "shape": {"name": {"type": "string"}}}})
        );
    }

    #[test]
    fn test_json_reports_parse_errors() {
        assert!(JsonLoader.parse("{ not json").is_err());
    }
}

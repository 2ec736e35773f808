//! Declarations and their resolution

use crate::{Error, Result};
use nxschema_convert::SchemaOptions;
use nxschema_fs::NormalizedPath;
use nxschema_module::DEFAULT_EXPORT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One request to keep a generated artifact in sync with a schema export,
/// as written in a declaration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    /// Path to the module containing the schema
    pub schema: String,

    /// Export to read from the module; `default` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,

    /// Where the artifact is written; derived from `schema` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_path: Option<String>,

    #[serde(default, skip_serializing_if = "DeclarationOptions::is_empty")]
    pub options: DeclarationOptions,
}

/// Dialect options as written; every field may be left out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DeclarationOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_command_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl DeclarationOptions {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Key-wise overlay: keys set in `later` win, the rest survive from `self`.
    pub fn overlay(&self, later: &Self) -> Self {
        Self {
            name: later.name.clone().or_else(|| self.name.clone()),
            title: later.title.clone().or_else(|| self.title.clone()),
            description: later
                .description
                .clone()
                .or_else(|| self.description.clone()),
            include_command_default: later
                .include_command_default
                .or(self.include_command_default),
            additional_properties: later.additional_properties.or(self.additional_properties),
        }
    }
}

impl Declaration {
    pub fn new(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            export_name: None,
            out_path: None,
            options: DeclarationOptions::default(),
        }
    }

    pub fn with_export(mut self, export_name: impl Into<String>) -> Self {
        self.export_name = Some(export_name.into());
        self
    }

    pub fn with_out_path(mut self, out_path: impl Into<String>) -> Self {
        self.out_path = Some(out_path.into());
        self
    }

    pub fn with_options(mut self, options: DeclarationOptions) -> Self {
        self.options = options;
        self
    }

    /// The export name, with the default export spelled out.
    pub fn export_name_or_default(&self) -> &str {
        self.export_name.as_deref().unwrap_or(DEFAULT_EXPORT)
    }

    /// Check the shape constraints that do not depend on the filesystem.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.schema.trim().is_empty() {
            return Err("`schema` must be a non-empty path".to_string());
        }
        if self.export_name.as_deref().is_some_and(|e| e.trim().is_empty()) {
            return Err("`exportName` must not be empty".to_string());
        }
        if self.out_path.as_deref().is_some_and(|p| p.trim().is_empty()) {
            return Err("`outPath` must not be empty".to_string());
        }
        if self.options.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err("`options.name` must not be empty".to_string());
        }
        Ok(())
    }

    /// Make `schema` and `outPath` absolute, relative to `dir`.
    ///
    /// Used to anchor declarations to the directory of the file that declared
    /// them before they are merged with declarations from other files.
    pub fn rebase(&self, dir: &NormalizedPath) -> Self {
        let anchor = |p: &str| NormalizedPath::new(p).absolutize(dir).to_string();
        Self {
            schema: anchor(&self.schema),
            export_name: self.export_name.clone(),
            out_path: self.out_path.as_deref().map(anchor),
            options: self.options.clone(),
        }
    }

    /// Fill in every default and anchor relative paths at `base`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDeclaration`] if the declaration fails
    /// [`validate`](Self::validate) or its artifact path is the schema path
    /// itself.
    pub fn resolve(&self, base: &NormalizedPath) -> Result<ResolvedDeclaration> {
        self.validate().map_err(|message| Error::InvalidDeclaration {
            schema: self.schema.clone(),
            message,
        })?;

        let schema = NormalizedPath::new(&self.schema).absolutize(base);
        let out_path = match &self.out_path {
            Some(out_path) => NormalizedPath::new(out_path).absolutize(base),
            None => NormalizedPath::new(derive_output_path(&self.schema)).absolutize(base),
        };
        if out_path == schema {
            return Err(Error::InvalidDeclaration {
                schema: self.schema.clone(),
                message: format!("outPath {out_path} would overwrite the schema module"),
            });
        }
        let export_name = self.export_name_or_default().to_string();
        let name = self
            .options
            .name
            .clone()
            .unwrap_or_else(|| to_pascal_case_schema_name(&export_name));

        Ok(ResolvedDeclaration {
            schema,
            export_name,
            out_path,
            options: SchemaOptions {
                name,
                title: self.options.title.clone(),
                description: self.options.description.clone(),
                include_command_default: self.options.include_command_default,
                additional_properties: self.options.additional_properties,
            },
        })
    }
}

/// A declaration with every default applied and every path absolute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDeclaration {
    pub schema: NormalizedPath,
    pub export_name: String,
    pub out_path: NormalizedPath,
    pub options: SchemaOptions,
}

impl ResolvedDeclaration {
    pub fn identity_key(&self) -> String {
        format!("{}:{}", self.schema, self.export_name)
    }
}

/// Derive an artifact path by swapping the schema module's extension for `.json`.
pub fn derive_output_path(schema: &str) -> String {
    NormalizedPath::new(schema).with_extension("json").to_string()
}

/// Derive a schema name from an export name.
///
/// - `default` → `DefaultSchema`
/// - `basicExecutorOptions` → `BasicExecutorOptionsSchema`
/// - `my-config` → `MyConfigSchema`
/// - `userSchema` → `UserSchema`
pub fn to_pascal_case_schema_name(export_name: &str) -> String {
    const SUFFIX: &str = "Schema";

    if export_name == DEFAULT_EXPORT {
        return format!("Default{SUFFIX}");
    }

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in export_name.chars() {
        if c == '-' || c == '_' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current.push(c);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let pascal: String = words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect();

    if pascal.ends_with(SUFFIX) {
        pascal
    } else {
        format!("{pascal}{SUFFIX}")
    }
}

/// Reject resolved declarations that would write the same artifact, or
/// write an artifact over any declaration's schema module.
pub fn ensure_unique_outputs(declarations: &[ResolvedDeclaration]) -> Result<()> {
    if let Some(declaration) = declarations
        .iter()
        .find(|d| declarations.iter().any(|other| other.schema == d.out_path))
    {
        return Err(Error::OutputIsSchema {
            path: declaration.out_path.to_string(),
        });
    }

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for declaration in declarations {
        *counts.entry(declaration.out_path.as_str()).or_default() += 1;
    }
    if counts.values().all(|&n| n == 1) {
        return Ok(());
    }
    let paths = declarations
        .iter()
        .map(|d| d.out_path.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Err(Error::DuplicateOutput { paths })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("default", "DefaultSchema")]
    #[case("basicExecutorOptions", "BasicExecutorOptionsSchema")]
    #[case("my-config", "MyConfigSchema")]
    #[case("user_settings", "UserSettingsSchema")]
    #[case("userSchema", "UserSchema")]
    #[case("HTTPServer", "HTTPServerSchema")]
    #[case("build options", "BuildOptionsSchema")]
    fn test_pascal_case_schema_name(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(to_pascal_case_schema_name(input), expected);
    }

    #[rstest]
    #[case("src/schema.yaml", "src/schema.json")]
    #[case("./lib/options.toml", "lib/options.json")]
    #[case("schema", "schema.json")]
    fn test_derive_output_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(derive_output_path(input), expected);
    }

    #[test]
    fn test_resolve_fills_defaults() {
        let base = NormalizedPath::new("/ws/libs/a");
        let resolved = Declaration::new("src/schema.yaml").resolve(&base).unwrap();

        assert_eq!(resolved.schema.as_str(), "/ws/libs/a/src/schema.yaml");
        assert_eq!(resolved.out_path.as_str(), "/ws/libs/a/src/schema.json");
        assert_eq!(resolved.export_name, "default");
        assert_eq!(resolved.options.name, "DefaultSchema");
        assert_eq!(resolved.identity_key(), "/ws/libs/a/src/schema.yaml:default");
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let base = NormalizedPath::new("/ws");
        let resolved = Declaration::new("schema.yaml")
            .with_export("buildOptions")
            .with_out_path("out/build.json")
            .with_options(DeclarationOptions {
                name: Some("Build".into()),
                additional_properties: Some(false),
                ..Default::default()
            })
            .resolve(&base)
            .unwrap();

        assert_eq!(resolved.out_path.as_str(), "/ws/out/build.json");
        assert_eq!(resolved.options.name, "Build");
        assert_eq!(resolved.options.additional_properties, Some(false));
    }

    #[test]
    fn test_resolve_rejects_empty_schema() {
        let err = Declaration::new("  ")
            .resolve(&NormalizedPath::new("/ws"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDeclaration { .. }));
    }

    #[test]
    fn test_rebase_anchors_paths() {
        let decl = Declaration::new("../shared/schema.yaml").with_out_path("schema.json");
        let rebased = decl.rebase(&NormalizedPath::new("/ws/libs/a"));
        assert_eq!(rebased.schema, "/ws/libs/shared/schema.yaml");
        assert_eq!(rebased.out_path.as_deref(), Some("/ws/libs/a/schema.json"));
    }

    #[test]
    fn test_overlay_is_key_wise() {
        let earlier = DeclarationOptions {
            name: Some("A".into()),
            title: Some("Title A".into()),
            ..Default::default()
        };
        let later = DeclarationOptions {
            name: Some("B".into()),
            description: Some("desc".into()),
            ..Default::default()
        };
        let merged = earlier.overlay(&later);
        assert_eq!(merged.name.as_deref(), Some("B"));
        assert_eq!(merged.title.as_deref(), Some("Title A"));
        assert_eq!(merged.description.as_deref(), Some("desc"));
    }

    #[test]
    fn test_unique_outputs() {
        let base = NormalizedPath::new("/ws");
        let a = Declaration::new("a.yaml").resolve(&base).unwrap();
        let b = Declaration::new("b.yaml").with_out_path("a.json").resolve(&base).unwrap();
        let c = Declaration::new("c.yaml").resolve(&base).unwrap();

        assert!(ensure_unique_outputs(&[a.clone(), c]).is_ok());
        let err = ensure_unique_outputs(&[a, b]).unwrap_err();
        assert!(err.to_string().contains("/ws/a.json, /ws/a.json"));
    }

    #[rstest]
    #[case(Declaration::new("schema.json"))]
    #[case(Declaration::new("src/schema.yaml").with_out_path("./src/../src/schema.yaml"))]
    fn test_resolve_rejects_output_over_schema(#[case] declaration: Declaration) {
        let err = declaration.resolve(&NormalizedPath::new("/ws")).unwrap_err();
        assert!(matches!(err, Error::InvalidDeclaration { .. }));
        assert!(err.to_string().contains("would overwrite the schema module"));
    }

    #[test]
    fn test_unique_outputs_rejects_output_over_other_schema() {
        let base = NormalizedPath::new("/ws");
        let a = Declaration::new("a.yaml").resolve(&base).unwrap();
        let b = Declaration::new("b.yaml").with_out_path("a.yaml").resolve(&base).unwrap();

        let err = ensure_unique_outputs(&[a, b]).unwrap_err();
        assert!(matches!(err, Error::OutputIsSchema { ref path } if path == "/ws/a.yaml"));
    }
}

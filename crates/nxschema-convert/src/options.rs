//! Dialect options and metadata vocabulary

use serde::{Deserialize, Serialize};

/// Options controlling the build-tool envelope around a converted schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaOptions {
    /// Logical schema name, emitted as `$id`
    pub name: String,

    /// Human title; defaults to `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Inject a positional-argument default on a top-level `command` property
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_command_default: Option<bool>,

    /// Emitted as `additionalProperties`; defaults to permissive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
}

impl SchemaOptions {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            description: None,
            include_command_default: None,
            additional_properties: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_command_default(mut self, include: bool) -> Self {
        self.include_command_default = Some(include);
        self
    }

    pub fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    pub fn effective_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    pub fn effective_command_default(&self) -> bool {
        self.include_command_default.unwrap_or(true)
    }

    pub fn effective_additional_properties(&self) -> bool {
        self.additional_properties.unwrap_or(true)
    }
}

/// Where the build tool takes a property's default value from at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefaultSource {
    Argv,
    ProjectName,
    Project,
    Target,
    Configuration,
    Cwd,
}

impl DefaultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Argv => "argv",
            Self::ProjectName => "projectName",
            Self::Project => "project",
            Self::Target => "target",
            Self::Configuration => "configuration",
            Self::Cwd => "cwd",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "argv" => Some(Self::Argv),
            "projectName" => Some(Self::ProjectName),
            "project" => Some(Self::Project),
            "target" => Some(Self::Target),
            "configuration" => Some(Self::Configuration),
            "cwd" => Some(Self::Cwd),
            _ => None,
        }
    }
}

impl std::fmt::Display for DefaultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = SchemaOptions::new("Build");
        assert_eq!(options.effective_title(), "Build");
        assert!(options.effective_command_default());
        assert!(options.effective_additional_properties());
    }

    #[test]
    fn test_unknown_option_keys_are_rejected() {
        let err = serde_json::from_str::<SchemaOptions>(r#"{"name": "a", "nmae": "b"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_default_source_round_trip() {
        for source in [
            DefaultSource::Argv,
            DefaultSource::ProjectName,
            DefaultSource::Project,
            DefaultSource::Target,
            DefaultSource::Configuration,
            DefaultSource::Cwd,
        ] {
            assert_eq!(DefaultSource::parse(source.as_str()), Some(source));
        }
        assert_eq!(DefaultSource::parse("env"), None);
    }
}

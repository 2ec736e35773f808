//! Settings files in any of the supported formats

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;

/// A serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Extensions in lookup priority order, with the format each maps to
    pub const EXTENSIONS: &'static [(&'static str, ConfigFormat)] = &[
        ("toml", ConfigFormat::Toml),
        ("json", ConfigFormat::Json),
        ("yaml", ConfigFormat::Yaml),
        ("yml", ConfigFormat::Yaml),
    ];

    pub fn from_extension(extension: &str) -> Option<Self> {
        let extension = extension.to_lowercase();
        Self::EXTENSIONS
            .iter()
            .find(|(ext, _)| *ext == extension)
            .map(|(_, format)| *format)
    }

    /// The format of `path`, from its extension.
    pub fn of(path: &NormalizedPath) -> Result<Self> {
        let extension = path.extension().unwrap_or("");
        Self::from_extension(extension).ok_or_else(|| Error::UnsupportedFormat {
            extension: extension.to_string(),
        })
    }

    fn parse<T: DeserializeOwned>(self, content: &str) -> std::result::Result<T, String> {
        match self {
            Self::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }

    fn render<T: Serialize>(self, value: &T) -> std::result::Result<String, String> {
        match self {
            Self::Toml => toml::to_string_pretty(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value)
                .map(|json| json + "\n")
                .map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Toml => write!(f, "TOML"),
            Self::Json => write!(f, "JSON"),
            Self::Yaml => write!(f, "YAML"),
        }
    }
}

/// Loads and saves settings files, detecting the format from the extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// First `<stem>.<ext>` file in `dir`, trying extensions in
    /// [`ConfigFormat::EXTENSIONS`] order.
    pub fn find(&self, dir: &NormalizedPath, stem: &str) -> Option<NormalizedPath> {
        ConfigFormat::EXTENSIONS
            .iter()
            .map(|(ext, _)| dir.join(&format!("{stem}.{ext}")))
            .find(|path| path.is_file())
    }

    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let format = ConfigFormat::of(path)?;
        let content = io::read_text(path)?;
        format.parse(&content).map_err(|message| Error::ConfigParse {
            path: path.to_native(),
            format,
            message,
        })
    }

    /// Serialize `value` in the format named by the extension and write it
    /// atomically.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let format = ConfigFormat::of(path)?;
        let content = format.render(value).map_err(|message| Error::ConfigSerialize {
            path: path.to_native(),
            format,
            message,
        })?;
        io::write_text(path, &content)
    }
}

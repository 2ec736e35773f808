//! Module resolution with ordered loader fallbacks

use crate::loader::{JsonLoader, ModuleLoader, TomlLoader, YamlLoader};
use crate::{Error, Result};
use nxschema_fs::{NormalizedPath, PathKind, io};
use serde_json::Value;

/// Export name used when a declaration does not name one
pub const DEFAULT_EXPORT: &str = "default";

/// Loads modules from disk and extracts their exports.
///
/// Loader selection: every registered loader that claims the file's
/// extension is tried in registration order. A file whose extension no
/// loader claims falls back to trying every loader in order, so the default
/// resolver attempts JSON, then YAML, then TOML.
pub struct ModuleResolver {
    loaders: Vec<Box<dyn ModuleLoader>>,
}

impl ModuleResolver {
    /// Resolver with the default strategies: JSON, YAML, TOML.
    pub fn new() -> Self {
        Self::empty()
            .with_loader(JsonLoader)
            .with_loader(YamlLoader)
            .with_loader(TomlLoader)
    }

    /// Resolver with no strategies registered.
    pub fn empty() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Register an additional loader after the existing ones.
    pub fn with_loader(mut self, loader: impl ModuleLoader + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    /// Names of the registered loaders, in the order they are tried
    pub fn loader_names(&self) -> Vec<&'static str> {
        self.loaders.iter().map(|l| l.name()).collect()
    }

    /// Load and parse a whole module.
    ///
    /// # Errors
    ///
    /// - [`Error::ModuleNotFound`] if nothing exists at `path`
    /// - [`Error::NotAFile`] if `path` is a directory or other non-file
    /// - [`Error::ModuleParse`] if no loader could parse the contents
    pub fn load_module(&self, path: &NormalizedPath) -> Result<Value> {
        match io::probe(path)? {
            PathKind::Missing => {
                return Err(Error::ModuleNotFound {
                    path: path.to_native(),
                });
            }
            PathKind::Other => {
                return Err(Error::NotAFile {
                    path: path.to_native(),
                });
            }
            PathKind::File => {}
        }

        let source = io::read_text(path)?;
        let extension = path.extension().unwrap_or("");

        let claimed: Vec<&dyn ModuleLoader> = self
            .loaders
            .iter()
            .map(|l| l.as_ref())
            .filter(|l| l.claims(extension))
            .collect();
        let candidates = if claimed.is_empty() {
            tracing::debug!(path = %path, "no loader claims extension, trying all");
            self.loaders.iter().map(|l| l.as_ref()).collect()
        } else {
            claimed
        };

        let mut failures = Vec::new();
        for loader in candidates {
            match loader.parse(&source) {
                Ok(value) => {
                    tracing::debug!(path = %path, loader = loader.name(), "loaded module");
                    return Ok(value);
                }
                Err(message) => failures.push(format!("{}: {}", loader.name(), message)),
            }
        }

        let message = if failures.is_empty() {
            "no module loader registered".to_string()
        } else {
            failures.join("; ")
        };
        Err(Error::ModuleParse {
            path: path.to_native(),
            message,
        })
    }

    /// Load a module and extract one export from it.
    ///
    /// # Errors
    ///
    /// Everything [`load_module`](Self::load_module) returns, plus
    /// [`Error::ExportNotFound`] when the export is absent, `null` or `false`.
    pub fn load_export(&self, path: &NormalizedPath, export_name: &str) -> Result<Value> {
        let module = self.load_module(path)?;
        extract_export(&module, export_name)
            .cloned()
            .ok_or_else(|| Error::ExportNotFound {
                path: path.to_native(),
                export: export_name.to_string(),
            })
    }
}

impl Default for ModuleResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up an export in a loaded module.
///
/// The default export of a module without a `default` key is the module
/// itself. Falsy values (`null`, `false`, numeric zero and the empty
/// string) count as absent.
pub fn extract_export<'a>(module: &'a Value, export_name: &str) -> Option<&'a Value> {
    let value = match module {
        Value::Object(map) => match map.get(export_name) {
            Some(value) => value,
            None if export_name == DEFAULT_EXPORT => module,
            None => return None,
        },
        other if export_name == DEFAULT_EXPORT => other,
        _ => return None,
    };

    (!is_falsy(value)).then_some(value)
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

//! Loader for declaration files
//!
//! A declaration file is a module whose default export is a *declaration
//! set*: either one declaration object or an array of them.
//!
//! ```yaml
//! # libs/my-plugin/nxschema.config.yaml
//! - schema: src/executors/build/schema.yaml
//!   exportName: buildOptions
//!   options:
//!     title: Build Executor Options
//! - schema: src/generators/init/schema.yaml
//! ```

use crate::declaration::Declaration;
use crate::discovery::{CONFIG_EXTENSIONS, find_root_config};
use crate::{Error, Result};
use nxschema_fs::NormalizedPath;
use nxschema_module::{DEFAULT_EXPORT, ModuleResolver, extract_export};
use serde_json::Value;
use std::path::Path;

/// Loads declaration sets through a [`ModuleResolver`].
pub struct DeclarationLoader {
    resolver: ModuleResolver,
}

impl DeclarationLoader {
    /// Create a loader backed by the default module resolver
    pub fn new() -> Self {
        Self::with_resolver(ModuleResolver::new())
    }

    pub fn with_resolver(resolver: ModuleResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &ModuleResolver {
        &self.resolver
    }

    /// Load one declaration file.
    ///
    /// Paths inside the returned declarations are exactly as written; callers
    /// anchor them with [`Declaration::rebase`].
    ///
    /// # Errors
    ///
    /// - [`Error::Module`] if the file cannot be loaded or parsed
    /// - [`Error::InvalidConfig`] if its default export is not a declaration set
    pub fn load_file(&self, path: &NormalizedPath) -> Result<Vec<Declaration>> {
        let module = self.resolver.load_module(path)?;
        let value = extract_export(&module, DEFAULT_EXPORT)
            .cloned()
            .unwrap_or(Value::Null);
        let declarations = parse_declaration_set(value, path.as_ref())?;
        tracing::debug!(path = %path, count = declarations.len(), "loaded declaration file");
        Ok(declarations)
    }

    /// Load the root-level declaration file, trying each supported extension
    /// in priority order.
    ///
    /// A workspace without one yields an empty list.
    pub fn autoload_root_config(
        &self,
        root: &NormalizedPath,
        config_name: &str,
    ) -> Result<Vec<Declaration>> {
        if let Some(path) = find_root_config(root, config_name) {
            tracing::debug!(path = %path, "found root declaration file");
            return self.load_file(&path);
        }

        tracing::warn!(
            "No {}.{{{}}} file present in {}",
            config_name,
            CONFIG_EXTENSIONS.join(","),
            root
        );
        Ok(Vec::new())
    }
}

impl Default for DeclarationLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalize a declaration file's default export into a list of declarations.
///
/// A single object becomes a one-element list. `null` and anything that is
/// neither an object nor an array are rejected, as is any array element that
/// is not an object.
pub fn parse_declaration_set(value: Value, path: &Path) -> Result<Vec<Declaration>> {
    let elements = match value {
        Value::Null => {
            return Err(Error::invalid_config(
                path,
                "declaration set is empty (expected an object or an array of objects)",
            ));
        }
        Value::Array(elements) => elements,
        object @ Value::Object(_) => vec![object],
        other => {
            return Err(Error::invalid_config(
                path,
                format!("expected an object or an array of objects, got {other}"),
            ));
        }
    };

    elements
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            if !element.is_object() {
                return Err(Error::invalid_config(
                    path,
                    format!("element {index} is not an object"),
                ));
            }
            let declaration: Declaration = serde_json::from_value(element).map_err(|e| {
                Error::invalid_config(path, format!("element {index}: {e}"))
            })?;
            declaration
                .validate()
                .map_err(|message| Error::invalid_config(path, format!("element {index}: {message}")))?;
            Ok(declaration)
        })
        .collect()
}

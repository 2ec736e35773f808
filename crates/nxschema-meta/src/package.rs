//! Declarations derived from a build-plugin package manifest
//!
//! A plugin package lists its runnables in two manifests referenced from
//! `package.json`:
//!
//! ```json
//! { "name": "my-plugin", "generators": "./generators.json", "executors": "./executors.json" }
//! ```
//!
//! Each runnable names the JSON schema file it ships. The source module for
//! that schema is expected next to it, with the same stem.

use crate::declaration::{Declaration, DeclarationOptions, to_pascal_case_schema_name};
use crate::{Error, Result};
use nxschema_fs::{NormalizedPath, io};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fmt;

/// Extension of the source module derived for each runnable schema
pub const DEFAULT_SOURCE_EXTENSION: &str = "yaml";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    #[serde(default)]
    generators: Option<String>,
    #[serde(default)]
    executors: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeneratorsManifest {
    #[serde(default)]
    generators: BTreeMap<String, RunnableEntry>,
}

#[derive(Debug, Deserialize)]
struct ExecutorsManifest {
    #[serde(default)]
    executors: BTreeMap<String, RunnableEntry>,
}

#[derive(Debug, Deserialize)]
struct RunnableEntry {
    schema: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    aliases: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunnableKind {
    Generator,
    Executor,
}

impl fmt::Display for RunnableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generator => write!(f, "Generator"),
            Self::Executor => write!(f, "Executor"),
        }
    }
}

/// Derive one declaration per generator and executor of a plugin package.
///
/// Generators come first, then executors, each in id order. Paths are
/// absolute, anchored at the directory containing `package.json`.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `package.json` or a manifest it
/// references is missing or malformed.
pub fn load_declarations_from_package(package_json: &NormalizedPath) -> Result<Vec<Declaration>> {
    let project_root = package_json
        .parent()
        .unwrap_or_else(|| NormalizedPath::new("."));
    let manifest: PackageManifest = read_json(package_json)?;

    let mut declarations = Vec::new();
    if let Some(generators) = &manifest.generators {
        let path = NormalizedPath::new(generators).absolutize(&project_root);
        let GeneratorsManifest { generators } = read_json(&path)?;
        declarations.extend(
            generators
                .iter()
                .map(|(id, entry)| runnable_declaration(RunnableKind::Generator, id, entry, &project_root)),
        );
    }
    if let Some(executors) = &manifest.executors {
        let path = NormalizedPath::new(executors).absolutize(&project_root);
        let ExecutorsManifest { executors } = read_json(&path)?;
        declarations.extend(
            executors
                .iter()
                .map(|(id, entry)| runnable_declaration(RunnableKind::Executor, id, entry, &project_root)),
        );
    }

    tracing::info!(
        package = %package_json,
        count = declarations.len(),
        "derived declarations from package"
    );
    Ok(declarations)
}

fn read_json<T: DeserializeOwned>(path: &NormalizedPath) -> Result<T> {
    let content = io::read_text(path)
        .map_err(|e| Error::invalid_config(path.to_native(), e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| Error::invalid_config(path.to_native(), e.to_string()))
}

fn runnable_declaration(
    kind: RunnableKind,
    id: &str,
    entry: &RunnableEntry,
    project_root: &NormalizedPath,
) -> Declaration {
    let name = to_pascal_case_schema_name(id);

    let aliases = if entry.aliases.is_empty() {
        String::new()
    } else {
        format!("aliases: {}", entry.aliases.join(", "))
    };
    let description = format!("{} {}", entry.description.as_deref().unwrap_or(""), aliases)
        .trim()
        .to_string();

    let stem = entry.schema.strip_suffix(".json").unwrap_or(&entry.schema);
    let schema = project_root.join(&format!("{stem}.{DEFAULT_SOURCE_EXTENSION}"));
    let out_path = project_root.join(&entry.schema);

    Declaration::new(schema.to_string())
        .with_out_path(out_path.to_string())
        .with_options(DeclarationOptions {
            title: Some(format!("{name} {kind} Options")),
            name: Some(name),
            description: Some(description),
            ..Default::default()
        })
}

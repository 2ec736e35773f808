//! Schema module loading for nxschema
//!
//! A *module* is a data document whose top-level keys are its exports. The
//! [`ModuleResolver`] loads a module from disk by trying an ordered list of
//! [`ModuleLoader`] strategies and extracts a named export from it:
//!
//! ```text
//! path ── probe ──> not found / not a file
//!          │
//!          └─> JSON (native) ─> YAML (superset) ─> TOML (legacy)
//!                                   │
//!                                   └─> export lookup ─> ExportNotFound
//! ```

pub mod error;
pub mod loader;
pub mod resolver;

pub use error::{Error, Result};
pub use loader::{JsonLoader, ModuleLoader, TomlLoader, YamlLoader};
pub use resolver::{DEFAULT_EXPORT, ModuleResolver, extract_export};

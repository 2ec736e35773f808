//! Declaration management for nxschema.
//!
//! A *declaration* asks for one generated artifact to be kept in sync with
//! one export of a schema module. This crate covers everything between the
//! files on disk and a list of resolved declarations:
//!
//! - [`loader`]: reading declaration files and normalizing their exports
//! - [`discovery`]: finding declaration files across a workspace
//! - [`merge`]: identity keys and later-wins merging of duplicates
//! - [`declaration`]: defaults, derived output paths and derived names
//! - [`package`]: deriving declarations from a plugin package manifest

pub mod declaration;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod merge;
pub mod package;

pub use declaration::{
    Declaration, DeclarationOptions, ResolvedDeclaration, derive_output_path,
    ensure_unique_outputs, to_pascal_case_schema_name,
};
pub use discovery::{
    CONFIG_EXTENSIONS, DEFAULT_CONFIG_NAME, DEFAULT_EXCLUDED_DIRS, Discovery, find_root_config,
};
pub use error::{Error, Result};
pub use loader::{DeclarationLoader, parse_declaration_set};
pub use merge::{identity_key, merge_declarations};
pub use package::{DEFAULT_SOURCE_EXTENSION, load_declarations_from_package};

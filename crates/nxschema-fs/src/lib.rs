//! Filesystem abstraction for nxschema
//!
//! Provides normalized path handling, atomic writes and a format-agnostic
//! settings store shared by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use io::PathKind;
pub use path::NormalizedPath;

//! Core orchestration layer for nxschema
//!
//! This crate ties the lower crates together:
//!
//! - **SyncEngine**: Manual and check-only reconciliation of artifacts
//! - **Reporting**: Issues, actions, the marker file and the orchestrator's
//!   check result
//! - **Project graph**: Where discovery looks for declaration files
//! - **Generation**: One-shot conversion of a list of declarations
//!
//! # Architecture
//!
//! ```text
//!                    nxschema-cli
//!                         |
//!                   nxschema-core
//!                         |
//!       +-----------+-----+------+-------------+
//!       |           |            |             |
//! nxschema-fs nxschema-module nxschema-meta nxschema-convert
//! ```
//!
//! # Example
//!
//! ```no_run
//! use nxschema_core::{SyncEngine, SyncMode, SyncOptions};
//! use nxschema_fs::NormalizedPath;
//!
//! fn example() -> nxschema_core::Result<()> {
//!     let engine = SyncEngine::open(NormalizedPath::new("/path/to/workspace"))?;
//!     let outcome = engine.run(SyncMode::CheckOnly, &SyncOptions::default())?;
//!     for issue in outcome.issue_messages() {
//!         println!("{issue}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod artifact;
pub mod error;
pub mod format;
pub mod generate;
pub mod graph;
pub mod mode;
pub mod settings;
pub mod sync;

pub use artifact::{artifact_matches, expected_artifact, render_artifact};
pub use error::{Error, Result};
pub use format::Formatter;
pub use generate::{GenerateReport, GenerateResult, Generator, generate_all};
pub use graph::{ProjectGraph, ProjectJsonGraph, ProjectNode, StaticProjectGraph};
pub use mode::SyncMode;
pub use settings::{DEFAULT_MARKER_NAME, SETTINGS_DIR, SyncSettings};
pub use sync::{
    ActionKind, GeneratorResult, Marker, SyncAction, SyncEngine, SyncIssue, SyncOptions,
    SyncOutcome, SyncState, classify,
};

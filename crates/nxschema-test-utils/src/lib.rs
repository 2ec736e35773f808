//! Shared test utilities for the nxschema workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`workspace`]: [`TestWorkspace`](workspace::TestWorkspace) builder for
//!   monorepo layouts with declaration files and schema modules

pub mod workspace;

pub use workspace::TestWorkspace;

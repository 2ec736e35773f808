//! SyncEngine for keeping artifacts consistent with their schema modules
//!
//! This module provides:
//! - **state**: Per-declaration classification (in sync, stale, missing, orphaned)
//! - **engine**: Discovery, merge and per-declaration repair or reporting
//! - **report**: Issues, actions and the outcome of a run
//! - **marker**: The marker file written at the end of every completed run

mod engine;
mod marker;
mod report;
mod state;

pub use engine::{SyncEngine, SyncOptions};
pub use marker::{Marker, SYNC_OK};
pub use report::{
    ActionKind, GeneratorResult, OUT_OF_SYNC_MESSAGE, SyncAction, SyncIssue, SyncOutcome,
};
pub use state::{SyncState, classify};

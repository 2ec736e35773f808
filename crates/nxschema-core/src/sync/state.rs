//! Per-declaration sync state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Consistency of one declaration's artifact with its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncState {
    /// Source and artifact exist and match
    InSync,
    /// Source and artifact exist but differ
    Stale,
    /// Source exists, artifact does not
    Missing,
    /// Artifact exists, source does not
    Orphaned,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InSync => write!(f, "in-sync"),
            Self::Stale => write!(f, "stale"),
            Self::Missing => write!(f, "missing"),
            Self::Orphaned => write!(f, "orphaned"),
        }
    }
}

/// Classify a declaration.
///
/// `content_matches` is only consulted when both source and artifact exist,
/// so callers can skip the conversion otherwise. `None` means neither side
/// exists and the declaration is skipped.
pub fn classify(
    source_exists: bool,
    artifact_exists: bool,
    content_matches: impl FnOnce() -> bool,
) -> Option<SyncState> {
    match (source_exists, artifact_exists) {
        (true, false) => Some(SyncState::Missing),
        (true, true) if content_matches() => Some(SyncState::InSync),
        (true, true) => Some(SyncState::Stale),
        (false, true) => Some(SyncState::Orphaned),
        (false, false) => None,
    }
}

//! Sync operating modes

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the [`SyncEngine`](crate::SyncEngine) reacts to divergence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Repair every divergence; the first error aborts the run.
    #[default]
    Manual,

    /// Never touch artifacts; every divergence or per-declaration failure
    /// becomes an issue and the run always completes.
    CheckOnly,
}

impl SyncMode {
    /// Whether this mode writes or deletes artifacts.
    pub fn repairs(&self) -> bool {
        matches!(self, SyncMode::Manual)
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" | "sync" | "fix" => Ok(SyncMode::Manual),
            "check-only" | "check" => Ok(SyncMode::CheckOnly),
            _ => Err(format!("unknown sync mode '{s}'")),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Manual => write!(f, "manual"),
            SyncMode::CheckOnly => write!(f, "check-only"),
        }
    }
}

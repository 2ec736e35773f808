//! Issues, actions and the outcome of a sync run

use crate::mode::SyncMode;
use crate::sync::marker::Marker;
use chrono::{DateTime, Utc};
use nxschema_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Header of the out-of-sync report
pub const OUT_OF_SYNC_MESSAGE: &str = "Schemas are out of sync";

/// One divergence or failure found by a check-only run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum SyncIssue {
    /// Source exists, artifact does not
    Missing { artifact: NormalizedPath },
    /// Artifact differs from what the source converts to
    Stale { artifact: NormalizedPath },
    /// Artifact exists but its source is gone
    Extra { artifact: NormalizedPath },
    /// Resolving or converting one declaration failed
    ProcessingFailed { artifact: NormalizedPath, message: String },
    /// A declaration file could not be loaded
    InvalidDeclarationFile { path: NormalizedPath, message: String },
    /// The merged declarations are inconsistent as a whole
    InvalidDeclarations { message: String },
}

impl fmt::Display for SyncIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { artifact } => {
                write!(f, "Missing artifact: {artifact} (source exists)")
            }
            Self::Stale { artifact } => {
                write!(f, "Stale artifact: {artifact} (content doesn't match source)")
            }
            Self::Extra { artifact } => {
                write!(f, "Extra artifact: {artifact} (source no longer exists)")
            }
            Self::ProcessingFailed { artifact, message } => {
                write!(f, "Error processing {artifact}: {message}")
            }
            Self::InvalidDeclarationFile { path, message } => {
                write!(f, "Invalid declaration file {path}: {message}")
            }
            Self::InvalidDeclarations { message } => write!(f, "Invalid declarations: {message}"),
        }
    }
}

/// What a manual run did (or, in a dry run, would do) to an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Generated,
    Regenerated,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncAction {
    pub kind: ActionKind,
    pub artifact: NormalizedPath,
    pub dry_run: bool,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.dry_run, self.kind) {
            (false, ActionKind::Generated) => write!(f, "Generated {}", self.artifact),
            (false, ActionKind::Regenerated) => write!(f, "Regenerated {}", self.artifact),
            (false, ActionKind::Removed) => write!(f, "Removed {}", self.artifact),
            (true, ActionKind::Generated) => write!(f, "[dry-run] Would generate {}", self.artifact),
            (true, ActionKind::Regenerated) => {
                write!(f, "[dry-run] Would regenerate {}", self.artifact)
            }
            (true, ActionKind::Removed) => write!(f, "[dry-run] Would remove {}", self.artifact),
        }
    }
}

/// Answer to the orchestrator's check call; absent when in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorResult {
    pub out_of_sync_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_of_sync_details: Option<String>,
}

/// Result of one sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    pub mode: SyncMode,
    pub dry_run: bool,
    /// Number of declaration files discovered
    pub declaration_files: usize,
    /// Number of declarations after merging
    pub declarations: usize,
    pub issues: Vec<SyncIssue>,
    pub actions: Vec<SyncAction>,
}

impl SyncOutcome {
    pub fn new(mode: SyncMode, dry_run: bool) -> Self {
        Self {
            mode,
            dry_run,
            declaration_files: 0,
            declarations: 0,
            issues: Vec::new(),
            actions: Vec::new(),
        }
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Human-readable issues, in the order they were found
    pub fn issue_messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }

    /// The marker this outcome records.
    pub fn marker(&self, now: DateTime<Utc>) -> Marker {
        if self.has_issues() {
            Marker::OutOfSync(self.issue_messages())
        } else {
            Marker::InSync(now)
        }
    }

    /// Marker file contents for this outcome.
    pub fn marker_contents(&self, now: DateTime<Utc>) -> String {
        self.marker(now).contents()
    }

    pub fn generator_result(&self) -> Option<GeneratorResult> {
        if !self.has_issues() {
            return None;
        }
        Some(GeneratorResult {
            out_of_sync_message: OUT_OF_SYNC_MESSAGE.to_string(),
            out_of_sync_details: Some(self.issue_messages().join("\n")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn artifact() -> NormalizedPath {
        NormalizedPath::new("/ws/libs/a/schema.json")
    }

    #[test]
    fn test_issue_messages() {
        let issues = [
            SyncIssue::Missing { artifact: artifact() },
            SyncIssue::Stale { artifact: artifact() },
            SyncIssue::Extra { artifact: artifact() },
            SyncIssue::ProcessingFailed {
                artifact: artifact(),
                message: "boom".into(),
            },
        ];
        let messages: Vec<String> = issues.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Missing artifact: /ws/libs/a/schema.json (source exists)",
                "Stale artifact: /ws/libs/a/schema.json (content doesn't match source)",
                "Extra artifact: /ws/libs/a/schema.json (source no longer exists)",
                "Error processing /ws/libs/a/schema.json: boom",
            ]
        );
    }

    #[test]
    fn test_action_display() {
        let action = SyncAction {
            kind: ActionKind::Removed,
            artifact: artifact(),
            dry_run: false,
        };
        assert_eq!(action.to_string(), "Removed /ws/libs/a/schema.json");
        let dry = SyncAction { dry_run: true, ..action };
        assert_eq!(dry.to_string(), "[dry-run] Would remove /ws/libs/a/schema.json");
    }

    #[test]
    fn test_clean_outcome() {
        let outcome = SyncOutcome::new(SyncMode::CheckOnly, false);
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();

        assert!(!outcome.has_issues());
        assert_eq!(outcome.issue_count(), 0);
        assert!(outcome.generator_result().is_none());
        assert_eq!(outcome.marker_contents(now), "SYNC OK 2026-01-02T03:04:05Z\n");
    }

    #[test]
    fn test_outcome_with_issues() {
        let mut outcome = SyncOutcome::new(SyncMode::CheckOnly, false);
        outcome.issues.push(SyncIssue::Missing { artifact: artifact() });
        outcome.issues.push(SyncIssue::Extra {
            artifact: NormalizedPath::new("/ws/b.json"),
        });

        assert_eq!(outcome.issue_count(), 2);
        assert_eq!(
            outcome.marker_contents(Utc::now()),
            "Schemas are out of sync\n\
             - Missing artifact: /ws/libs/a/schema.json (source exists)\n\
             - Extra artifact: /ws/b.json (source no longer exists)\n"
        );

        let result = outcome.generator_result().unwrap();
        assert_eq!(result.out_of_sync_message, "Schemas are out of sync");
        assert_eq!(
            serde_json::to_value(&result).unwrap()["outOfSyncDetails"],
            serde_json::json!(
                "Missing artifact: /ws/libs/a/schema.json (source exists)\n\
                 Extra artifact: /ws/b.json (source no longer exists)"
            )
        );
    }

    #[test]
    fn test_issue_serializes_with_kind() {
        let value = serde_json::to_value(SyncIssue::Stale { artifact: artifact() }).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "kind": "stale", "artifact": "/ws/libs/a/schema.json" })
        );
    }
}

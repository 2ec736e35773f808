//! The marker file recording the outcome of the last completed run

use crate::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use nxschema_fs::{NormalizedPath, io};

use super::report::OUT_OF_SYNC_MESSAGE;

/// Sentinel opening the marker of a clean run
pub const SYNC_OK: &str = "SYNC OK";

/// Contents of the marker file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    /// No issues; records when the run finished
    InSync(DateTime<Utc>),
    /// One line per issue, under the out-of-sync header
    OutOfSync(Vec<String>),
    /// The run failed outside the per-declaration loop
    Failed(String),
}

impl Marker {
    /// Marker text, always newline-terminated.
    pub fn contents(&self) -> String {
        match self {
            Marker::InSync(now) => format!(
                "{SYNC_OK} {}\n",
                now.to_rfc3339_opts(SecondsFormat::Secs, true)
            ),
            Marker::OutOfSync(issues) => {
                let mut text = format!("{OUT_OF_SYNC_MESSAGE}\n");
                for issue in issues {
                    text.push_str(&format!("- {issue}\n"));
                }
                text
            }
            Marker::Failed(error) => format!("Sync generator failed: {error}\n"),
        }
    }

    /// Write the marker atomically to `path`.
    pub fn write(&self, path: &NormalizedPath) -> Result<()> {
        io::write_text(path, &self.contents())?;
        tracing::debug!(path = %path, "wrote marker");
        Ok(())
    }
}

//! Best-effort formatting of written artifacts
//!
//! Workspaces that run a formatter over JSON files would otherwise see every
//! generated artifact rewritten by their tooling. Running the same formatter
//! right after writing keeps the two in agreement. Artifact comparison is
//! structural, so formatting never causes staleness either way.

use nxschema_fs::NormalizedPath;
use std::path::Path;
use std::process::Command;

/// Runs an external formatter on written artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formatter {
    program: String,
    args: Vec<String>,
}

impl Formatter {
    /// Build a formatter from `[program, args...]`; `None` for an empty command.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }

    /// Format `artifact` in place, running from `work_dir`.
    ///
    /// Returns whether formatting succeeded. Failures are logged and never
    /// propagate: the artifact is already written and valid.
    pub fn format(&self, artifact: &NormalizedPath, work_dir: &Path) -> bool {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(artifact.to_native())
            .current_dir(work_dir)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                tracing::debug!(artifact = %artifact, formatter = %self.program, "formatted artifact");
                true
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                tracing::warn!(
                    artifact = %artifact,
                    formatter = %self.program,
                    exit_code = ?output.status.code(),
                    "formatter failed: {}",
                    stderr.trim()
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    artifact = %artifact,
                    formatter = %self.program,
                    "could not run formatter: {}",
                    e
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_from_command() {
        assert!(Formatter::from_command(&[]).is_none());
        assert!(Formatter::from_command(&[" ".to_string()]).is_none());
        let formatter =
            Formatter::from_command(&["prettier".to_string(), "--write".to_string()]).unwrap();
        assert_eq!(formatter.program, "prettier");
        assert_eq!(formatter.args, vec!["--write"]);
    }

    #[test]
    fn test_missing_program_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let formatter =
            Formatter::from_command(&["nxschema-no-such-formatter".to_string()]).unwrap();
        let artifact = NormalizedPath::new(temp.path()).join("schema.json");
        assert!(!formatter.format(&artifact, temp.path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_formatter() {
        let temp = TempDir::new().unwrap();
        let artifact = NormalizedPath::new(temp.path()).join("schema.json");
        std::fs::write(artifact.to_native(), "{}").unwrap();
        let formatter = Formatter::from_command(&["true".to_string()]).unwrap();
        assert!(formatter.format(&artifact, temp.path()));
    }
}

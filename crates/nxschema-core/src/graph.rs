//! Read-only view of the workspace's project graph
//!
//! Discovery only needs to know where projects live. The build orchestrator
//! owns the real graph; [`ProjectJsonGraph`] reconstructs the part we need
//! from `project.json` files, and [`StaticProjectGraph`] serves tests and
//! embedders that already hold the list.

use crate::{Error, Result};
use nxschema_fs::{NormalizedPath, io};
use nxschema_meta::DEFAULT_EXCLUDED_DIRS;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

/// A project in the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectNode {
    pub name: String,
    /// Project root, relative to the workspace root (`.` for the root project)
    pub root: NormalizedPath,
}

impl ProjectNode {
    pub fn new(name: impl Into<String>, root: impl Into<NormalizedPath>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }
}

/// Query for the projects of a workspace.
pub trait ProjectGraph {
    /// All projects, in no particular order.
    fn projects(&self) -> Result<Vec<ProjectNode>>;
}

/// A fixed list of projects.
#[derive(Debug, Clone, Default)]
pub struct StaticProjectGraph {
    projects: Vec<ProjectNode>,
}

impl StaticProjectGraph {
    pub fn new(projects: Vec<ProjectNode>) -> Self {
        Self { projects }
    }

    /// A graph with no projects; discovery then covers the whole workspace.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl ProjectGraph for StaticProjectGraph {
    fn projects(&self) -> Result<Vec<ProjectNode>> {
        Ok(self.projects.clone())
    }
}

#[derive(Debug, Deserialize)]
struct ProjectJson {
    name: Option<String>,
}

/// Projects found by walking the workspace for `project.json` files.
///
/// A project's name is the `name` key of its `project.json`, or its
/// directory name when the key is absent.
#[derive(Debug, Clone)]
pub struct ProjectJsonGraph {
    root: NormalizedPath,
}

impl ProjectJsonGraph {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self { root: root.into() }
    }
}

impl ProjectGraph for ProjectJsonGraph {
    fn projects(&self) -> Result<Vec<ProjectNode>> {
        if !self.root.is_dir() {
            return Err(Error::ProjectGraph {
                message: format!("workspace root {} is not a directory", self.root),
            });
        }

        let walker = WalkDir::new(self.root.to_native())
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| {
                if e.depth() > 0 && e.file_type().is_dir() {
                    let name = e.file_name().to_string_lossy();
                    return !DEFAULT_EXCLUDED_DIRS.iter().any(|d| name == *d);
                }
                true
            });

        let mut projects = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("failed to access entry in {}: {}", self.root, e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || entry.file_name().to_str() != Some("project.json") {
                continue;
            }

            let path = NormalizedPath::new(entry.path());
            let content = io::read_text(&path)?;
            let project: ProjectJson =
                serde_json::from_str(&content).map_err(|e| Error::ProjectGraph {
                    message: format!("invalid {}: {}", path, e),
                })?;

            let dir = path.parent().unwrap_or_else(|| self.root.clone());
            let root = dir
                .relative_to(&self.root)
                .unwrap_or_else(|| dir.clone());
            let name = project
                .name
                .or_else(|| dir.file_name().map(str::to_string))
                .unwrap_or_else(|| root.to_string());

            tracing::debug!(project = %name, root = %root, "found project");
            projects.push(ProjectNode { name, root });
        }

        projects.sort_by(|a, b| a.root.cmp(&b.root));
        Ok(projects)
    }
}

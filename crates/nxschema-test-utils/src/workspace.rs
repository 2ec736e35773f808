//! [`TestWorkspace`] builder for sync scenarios.

use nxschema_fs::NormalizedPath;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// File name of declaration files written by [`TestWorkspace::write_declarations`]
pub const DECLARATION_FILE: &str = "nxschema.config.json";

/// A temporary monorepo with helper methods for test setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use nxschema_test_utils::TestWorkspace;
/// use serde_json::json;
///
/// let ws = TestWorkspace::new();
/// ws.add_project("lib-a", "libs/a");
/// ws.write_schema_module("libs/a/schema.yaml", &json!({ "type": "object", "shape": {} }));
/// ws.write_declarations("libs/a", &json!({ "schema": "schema.yaml" }));
/// ws.assert_file_exists("libs/a/nxschema.config.json");
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary workspace.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The canonical workspace root as a [`NormalizedPath`].
    ///
    /// Canonicalized so that comparisons with walked paths hold on platforms
    /// where the temp directory sits behind a symlink.
    pub fn normalized_root(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
            .canonicalize()
            .unwrap()
    }

    /// Absolute native path of `rel`.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write_file(&self, rel: &str, content: &str) {
        let full_path = self.path(rel);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }

    /// Create a directory (and its parents) at `rel`.
    pub fn create_dir(&self, rel: &str) {
        fs::create_dir_all(self.path(rel)).unwrap();
    }

    /// Write `value` as pretty JSON with a trailing newline.
    pub fn write_json(&self, rel: &str, value: &Value) {
        let mut content = serde_json::to_string_pretty(value).unwrap();
        content.push('\n');
        self.write_file(rel, &content);
    }

    /// Write a schema module, as YAML for `.yaml`/`.yml` paths and JSON otherwise.
    pub fn write_schema_module(&self, rel: &str, module: &Value) {
        if rel.ends_with(".yaml") || rel.ends_with(".yml") {
            self.write_file(rel, &serde_yaml::to_string(module).unwrap());
        } else {
            self.write_json(rel, module);
        }
    }

    /// Write `<dir>/nxschema.config.json` holding `declarations`.
    ///
    /// An empty `dir` writes the root-level declaration file.
    pub fn write_declarations(&self, dir: &str, declarations: &Value) {
        if dir.is_empty() {
            self.write_json(DECLARATION_FILE, declarations);
        } else {
            self.write_json(&format!("{dir}/{DECLARATION_FILE}"), declarations);
        }
    }

    /// Register a project by writing `<root>/project.json`.
    pub fn add_project(&self, name: &str, root: &str) {
        self.write_json(
            &format!("{root}/project.json"),
            &serde_json::json!({ "name": name }),
        );
    }

    /// Read `rel` as text.
    ///
    /// # Panics
    /// Panics if the file cannot be read.
    pub fn read_file(&self, rel: &str) -> String {
        let full_path = self.path(rel);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    /// Read `rel` and parse it as JSON.
    pub fn read_json(&self, rel: &str) -> Value {
        serde_json::from_str(&self.read_file(rel)).unwrap()
    }

    /// Remove the file at `rel`.
    pub fn remove_file(&self, rel: &str) {
        fs::remove_file(self.path(rel)).unwrap();
    }

    /// Assert that `path` (relative to the workspace root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the workspace root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.path(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` (relative to root) contains `content`.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read_file(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            self.path(path).display(),
            content,
            file_content
        );
    }
}

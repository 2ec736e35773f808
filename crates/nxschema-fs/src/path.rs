//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Paths are lexically cleaned on construction: `.` segments and empty
/// segments are dropped and `..` consumes the preceding segment. Two
/// `NormalizedPath`s that name the same location through different spellings
/// (`a/./b`, `a/c/../b`, `a\b`) compare equal, which is what declaration
/// identity relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let raw = path.as_ref().to_string_lossy().replace('\\', "/");
        Self {
            inner: clean(&raw),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    ///
    /// An absolute segment replaces the base entirely.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if is_absolute_str(&segment) {
            return Self {
                inner: clean(&segment),
            };
        }
        let joined = if self.inner == "." {
            segment
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        match self.inner.rfind('/') {
            Some(0) if self.inner.len() > 1 => Some(Self {
                inner: "/".to_string(),
            }),
            Some(0) => None,
            Some(idx) => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            None if self.inner == "." || self.inner == ".." => None,
            None => Some(Self {
                inner: ".".to_string(),
            }),
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        match self.inner.rsplit('/').next() {
            Some("") | Some(".") | Some("..") | None => None,
            Some(name) => Some(name),
        }
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// Get the file name without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        self.file_name().map(|name| match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        })
    }

    /// Replace (or add) the extension of the final component.
    pub fn with_extension(&self, extension: &str) -> Self {
        let Some(stem) = self.file_stem() else {
            return self.clone();
        };
        let file = if extension.is_empty() {
            stem.to_string()
        } else {
            format!("{}.{}", stem, extension)
        };
        match self.parent() {
            Some(parent) => parent.join(&file),
            None => Self::new(file),
        }
    }

    /// Whether the path is absolute (POSIX root or a Windows drive).
    pub fn is_absolute(&self) -> bool {
        is_absolute_str(&self.inner)
    }

    /// Resolve a relative path against `base`; absolute paths are returned as-is.
    pub fn absolutize(&self, base: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            base.join(&self.inner)
        }
    }

    /// Component-wise prefix check (`a/bc` does not start with `a/b`).
    pub fn starts_with(&self, prefix: &NormalizedPath) -> bool {
        if prefix.inner == "." {
            return !self.is_absolute();
        }
        if prefix.inner == "/" {
            return self.inner.starts_with('/');
        }
        self.inner == prefix.inner
            || self
                .inner
                .strip_prefix(&prefix.inner)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    /// Express this path relative to `base`, if it lies underneath it.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        if !self.starts_with(base) {
            return None;
        }
        if self.inner == base.inner {
            return Some(Self {
                inner: ".".to_string(),
            });
        }
        let rest = if base.inner == "/" {
            &self.inner[1..]
        } else if base.inner == "." {
            &self.inner[..]
        } else {
            &self.inner[base.inner.len() + 1..]
        };
        Some(Self::new(rest))
    }

    /// Canonicalize against the real filesystem, without UNC prefixes on Windows.
    pub fn canonicalize(&self) -> std::io::Result<Self> {
        dunce::canonicalize(self.to_native()).map(Self::new)
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

fn is_absolute_str(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/') || (bytes.len() >= 2 && bytes[1] == b':' && bytes[0].is_ascii_alphabetic())
}

/// Lexically clean a forward-slash path.
fn clean(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." && !last.ends_with(':') => {
                    parts.pop();
                }
                // `..` cannot climb above a root or a drive
                Some(&last) if last.ends_with(':') => {}
                _ if absolute => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let body = parts.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{}", body),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

impl serde::Serialize for NormalizedPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.inner)
    }
}

impl<'de> serde::Deserialize<'de> for NormalizedPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(raw))
    }
}

use core::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A file path expressed relative to the streamed-files root directory.
///
/// The stored form is canonical regardless of what the host hands us:
/// - separators are forward slashes;
/// - exactly one leading slash, no trailing slash;
/// - empty segments are collapsed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RelativePath(String);

impl RelativePath {
    /// Creates a relative path, normalizing to the canonical form.
    pub fn new(path: impl AsRef<str>) -> Self {
        let raw = path.as_ref().replace('\\', "/");
        let mut normalized = String::with_capacity(raw.len() + 1);
        for segment in raw.split('/').filter(|s| !s.is_empty()) {
            normalized.push('/');
            normalized.push_str(segment);
        }
        if normalized.is_empty() {
            normalized.push('/');
        }
        Self(normalized)
    }

    /// Expresses `absolute` relative to `root`.
    ///
    /// Returns `None` when `absolute` does not lie strictly under
    /// `root` - a tracked file is always inside the root, never the
    /// root itself.
    pub fn strip_root(absolute: &Path, root: &Path) -> Option<Self> {
        let suffix = absolute.strip_prefix(root).ok()?;
        if suffix.as_os_str().is_empty() {
            return None;
        }
        Some(Self::new(suffix.to_string_lossy()))
    }

    /// Returns the canonical string form, starting with one `/`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins the path back onto a root directory.
    pub fn to_absolute(&self, root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(self.0.trim_start_matches('/'))
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for RelativePath {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl From<RelativePath> for String {
    fn from(path: RelativePath) -> Self {
        path.0
    }
}

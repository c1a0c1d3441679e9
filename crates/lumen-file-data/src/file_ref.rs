use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{FileId, RelativePath};

/// Error returned when a file reference cannot be created.
#[derive(Error, Debug)]
pub enum Error {
    /// The referenced file does not lie under the root directory.
    #[error("path '{path}' is not under root '{root}'")]
    PathOutsideRoot {
        /// The offending absolute path.
        path: PathBuf,
        /// The root directory the path was checked against.
        root: PathBuf,
    },
}

/// A reference record for one externally stored file.
///
/// The record pairs the file's permanent [`FileId`] with its current
/// location under the root directory. The id never changes; the
/// relative path is the only mutable piece of state and is rewritten
/// exclusively through [`FileRef::reconcile`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    display_name: String,
    id: FileId,
    relative_path: RelativePath,
}

/// Result of reconciling one [`FileRef`] against the resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The stored path still matches the file's location.
    Unchanged,
    /// The file moved under the root; the carried record holds the
    /// rewritten path.
    Updated(FileRef),
    /// The resolver no longer knows the file. The stored path is left
    /// untouched so the record can be followed up on manually.
    Orphaned,
    /// The file moved outside the root directory. The stored path is
    /// left untouched.
    OutOfRoot(PathBuf),
}

impl FileRef {
    /// Creates a record for the file at `absolute_path`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::PathOutsideRoot`] when `absolute_path` does
    /// not lie under `root`.
    pub fn new(
        display_name: impl Into<String>,
        absolute_path: impl AsRef<Path>,
        id: FileId,
        root: impl AsRef<Path>,
    ) -> Result<Self, Error> {
        let absolute_path = absolute_path.as_ref();
        let root = root.as_ref();
        let relative_path = RelativePath::strip_root(absolute_path, root).ok_or_else(|| {
            Error::PathOutsideRoot {
                path: absolute_path.to_owned(),
                root: root.to_owned(),
            }
        })?;
        Ok(Self {
            display_name: display_name.into(),
            id,
            relative_path,
        })
    }

    /// Human-readable label, fixed at creation.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The file's permanent id.
    pub fn id(&self) -> FileId {
        self.id
    }

    /// The file's stored path relative to the root directory.
    pub fn relative_path(&self) -> &RelativePath {
        &self.relative_path
    }

    /// The file's stored location under the given root directory.
    pub fn absolute_path(&self, root: impl AsRef<Path>) -> PathBuf {
        self.relative_path.to_absolute(root)
    }

    /// Checks the stored path against the resolver's current location
    /// for this record's id.
    ///
    /// The record itself is never mutated; an [`ReconcileOutcome::Updated`]
    /// outcome carries the rewritten record and the caller decides
    /// whether and how to persist it. Reconciling twice against the
    /// same resolver result yields [`ReconcileOutcome::Unchanged`] the
    /// second time.
    pub fn reconcile(&self, resolved: Option<&Path>, root: impl AsRef<Path>) -> ReconcileOutcome {
        let current = match resolved {
            Some(current) => current,
            None => return ReconcileOutcome::Orphaned,
        };

        match RelativePath::strip_root(current, root.as_ref()) {
            None => ReconcileOutcome::OutOfRoot(current.to_owned()),
            Some(relative_path) if relative_path == self.relative_path => {
                ReconcileOutcome::Unchanged
            }
            Some(relative_path) => ReconcileOutcome::Updated(Self {
                display_name: self.display_name.clone(),
                id: self.id,
                relative_path,
            }),
        }
    }
}

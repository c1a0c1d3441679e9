use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::PathBuf;

use crate::FileId;

/// The authoritative source for "where is this file now".
///
/// The host environment owns the index from permanent ids to current
/// file locations; this trait is the seam through which it is injected
/// so reconciliation carries no hidden global state.
pub trait PathResolver {
    /// Returns the current absolute path of the file with the given
    /// id, or `None` when the id is no longer known.
    fn resolve(&self, id: FileId) -> Option<PathBuf>;
}

impl<F> PathResolver for F
where
    F: Fn(FileId) -> Option<PathBuf>,
{
    fn resolve(&self, id: FileId) -> Option<PathBuf> {
        (self)(id)
    }
}

impl<S> PathResolver for HashMap<FileId, PathBuf, S>
where
    S: BuildHasher,
{
    fn resolve(&self, id: FileId) -> Option<PathBuf> {
        self.get(&id).cloned()
    }
}

use std::path::Path;

use tracing::warn;

use crate::{FileId, FileRef, PathResolver, ReconcileOutcome};

/// Aggregate result of one reconciliation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScanReport {
    /// Records whose stored path was rewritten.
    pub updated: Vec<FileId>,
    /// Records whose id the resolver no longer knows.
    pub orphaned: Vec<FileId>,
    /// Records whose file moved outside the root directory.
    pub out_of_root: Vec<FileId>,
    /// Number of records whose stored path was already current.
    pub unchanged: usize,
}

impl ScanReport {
    /// `true` when every record was already current.
    pub fn is_clean(&self) -> bool {
        self.updated.is_empty() && self.orphaned.is_empty() && self.out_of_root.is_empty()
    }
}

/// Reconciles every record against the resolver, rewriting stale paths
/// in place.
///
/// Records are independent of one another, so this is a single linear
/// pass in whatever order the iterator yields. Running the scan twice
/// against an unchanged resolver reports every record as unchanged the
/// second time. Orphaned and out-of-root records are reported and
/// logged, never dropped or rewritten.
pub fn scan<'a, I, R>(records: I, resolver: &R, root: impl AsRef<Path>) -> ScanReport
where
    I: IntoIterator<Item = &'a mut FileRef>,
    R: PathResolver,
{
    let root = root.as_ref();
    let mut report = ScanReport::default();

    for record in records {
        let resolved = resolver.resolve(record.id());
        match record.reconcile(resolved.as_deref(), root) {
            ReconcileOutcome::Unchanged => report.unchanged += 1,
            ReconcileOutcome::Updated(updated) => {
                report.updated.push(record.id());
                *record = updated;
            }
            ReconcileOutcome::Orphaned => {
                warn!(
                    "lost file path for '{}' ({}), last seen at '{}'",
                    record.display_name(),
                    record.id(),
                    record.relative_path()
                );
                report.orphaned.push(record.id());
            }
            ReconcileOutcome::OutOfRoot(path) => {
                warn!(
                    "file for '{}' ({}) moved outside '{}': '{}'",
                    record.display_name(),
                    record.id(),
                    root.display(),
                    path.display()
                );
                report.out_of_root.push(record.id());
            }
        }
    }

    report
}

//! Snapshot reconciliation
//!
//! Diffs each incoming snapshot against the previous one and applies only the
//! per-name changes to the ordered view, so that the common case (content
//! updates that do not move anything) costs no sort and no reindex.

use std::sync::Arc;
use std::time::Instant;

use crate::error::CoreResult;
use crate::types::ModelSnapshot;

use super::classifier::classify;
use super::view_index::{ViewChanges, ViewIndex};

/// Names that changed between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    /// Present only in the new snapshot, sorted by name
    pub added: Vec<String>,
    /// Present only in the previous snapshot
    pub removed: Vec<String>,
    /// Present in both with different content
    pub updated: Vec<String>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }
}

/// Compute added/removed/updated names from `previous` to `next`.
///
/// Records shared by both snapshots are skipped without a content comparison.
pub fn diff_snapshots(previous: &ModelSnapshot, next: &ModelSnapshot) -> SnapshotDiff {
    let removed = previous
        .names()
        .filter(|name| !next.contains(name))
        .map(str::to_string)
        .collect();

    let mut added = Vec::new();
    let mut updated = Vec::new();
    for (name, file) in next.iter() {
        match previous.get(name) {
            None => added.push(name.to_string()),
            Some(old) if !Arc::ptr_eq(old, file) && old != file => updated.push(name.to_string()),
            Some(_) => {}
        }
    }
    // Snapshots are unordered; give additions a stable insertion order.
    added.sort_unstable();

    SnapshotDiff {
        added,
        removed,
        updated,
    }
}

/// Summary of one reconciliation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
    pub updated: usize,
    pub resorted: bool,
    pub reindexed: bool,
}

impl ReconcileStats {
    /// Whether the pass left the view untouched
    pub fn is_unchanged(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.updated == 0
    }
}

/// Reconciliation engine: previous snapshot plus the ordered view derived from it
#[derive(Debug, Default)]
pub struct Reconciler {
    previous: ModelSnapshot,
    index: ViewIndex,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last accepted snapshot
    pub fn previous(&self) -> &ModelSnapshot {
        &self.previous
    }

    pub fn index(&self) -> &ViewIndex {
        &self.index
    }

    pub(crate) fn index_mut(&mut self) -> &mut ViewIndex {
        &mut self.index
    }

    /// Bring the ordered view in line with `snapshot`.
    ///
    /// Every added or updated record is classified before anything is
    /// mutated; if one fails the snapshot is rejected and the view, the index
    /// and the previous snapshot are left exactly as they were.
    pub fn apply_snapshot(&mut self, snapshot: ModelSnapshot) -> CoreResult<ReconcileStats> {
        let started = Instant::now();
        log::debug!("Received next model files ({} entries)", snapshot.len());

        let diff = diff_snapshots(&self.previous, &snapshot);
        if diff.is_empty() {
            self.previous = snapshot;
            return Ok(ReconcileStats::default());
        }

        let classify_all = |names: &[String]| {
            names
                .iter()
                .filter_map(|name| snapshot.get(name))
                .map(|file| classify(file, false))
                .collect::<CoreResult<Vec<_>>>()
        };
        let updated = classify_all(diff.updated.as_slice())?;
        let added = classify_all(diff.added.as_slice())?;

        let (added_count, removed_count, updated_count) =
            (diff.added.len(), diff.removed.len(), diff.updated.len());
        let outcome = self.index.apply(ViewChanges {
            updated,
            added,
            removed: diff.removed,
        });
        self.previous = snapshot;

        let stats = ReconcileStats {
            added: added_count,
            removed: removed_count,
            updated: updated_count,
            resorted: outcome.resorted,
            reindexed: outcome.reindexed,
        };
        log::debug!(
            "ViewFile reconciliation took {} ms: {stats:?}",
            started.elapsed().as_millis()
        );
        Ok(stats)
    }
}

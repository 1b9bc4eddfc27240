//! Ordered view collection with a name -> position index
//!
//! `files` is the canonical display order and `indices` maps each name to its
//! position in `files`. The two are only ever rebuilt together by
//! [`ViewIndex::rebuild_index`], so `files[indices[name]].name == name` holds
//! whenever a `ViewIndex` is observable.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::traits::ViewFileComparator;
use crate::types::ViewFile;

/// Published, immutable view of the ordered records
pub type ViewFileList = Arc<Vec<Arc<ViewFile>>>;

/// Per-name changes of one reconciliation pass, already classified
#[derive(Debug, Default)]
pub(crate) struct ViewChanges {
    /// Replacement records for names already present
    pub updated: Vec<ViewFile>,
    /// Records for names not yet present, in insertion order
    pub added: Vec<ViewFile>,
    /// Names to drop
    pub removed: Vec<String>,
}

/// What applying a [`ViewChanges`] did to the ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ApplyOutcome {
    pub resorted: bool,
    pub reindexed: bool,
}

/// Order/index maintainer
#[derive(Clone, Default)]
pub struct ViewIndex {
    files: ViewFileList,
    indices: HashMap<String, usize>,
    comparator: Option<ViewFileComparator>,
    resort_count: u64,
}

impl std::fmt::Debug for ViewIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewIndex")
            .field("len", &self.files.len())
            .field("has_comparator", &self.comparator.is_some())
            .field("resort_count", &self.resort_count)
            .finish_non_exhaustive()
    }
}

impl ViewIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current ordered records
    pub fn files(&self) -> &ViewFileList {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.indices.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ViewFile>> {
        self.position(name).map(|pos| &self.files[pos])
    }

    /// Number of full re-sorts performed so far
    pub fn resort_count(&self) -> u64 {
        self.resort_count
    }

    /// Replace the comparator, then re-sort everything and rebuild the index.
    ///
    /// `None` keeps the current order (insertion order from here on).
    pub(crate) fn set_comparator(&mut self, comparator: Option<ViewFileComparator>) {
        self.comparator = comparator;
        if self.comparator.is_some() {
            log::debug!("Re-sorting {} view files", self.files.len());
            self.resort();
        }
        self.rebuild_index();
    }

    /// Swap in a record with the same name at its current position.
    ///
    /// Returns the record it replaced. Order and index are untouched.
    pub(crate) fn replace(&mut self, file: ViewFile) -> CoreResult<Arc<ViewFile>> {
        let pos = self
            .position(&file.name)
            .ok_or_else(|| CoreError::FileNotFound(file.name.clone()))?;
        let files = Arc::make_mut(&mut self.files);
        Ok(std::mem::replace(&mut files[pos], Arc::new(file)))
    }

    /// Apply updates, then additions, then removals; re-sort and reindex only
    /// when the pass requires it.
    ///
    /// Additions whose name is already indexed, or repeated within the batch,
    /// are dropped.
    pub(crate) fn apply(&mut self, changes: ViewChanges) -> ApplyOutcome {
        let ViewChanges {
            updated,
            added,
            removed,
        } = changes;

        let mut needs_resort = false;
        let mut order_changed = false;

        if !updated.is_empty() {
            let files = Arc::make_mut(&mut self.files);
            for file in updated {
                let Some(&pos) = self.indices.get(&file.name) else {
                    log::warn!("Skipping update for unindexed view file: {}", file.name);
                    continue;
                };
                let old = &files[pos];
                let new = Arc::new(ViewFile {
                    is_selected: old.is_selected,
                    ..file
                });
                if let Some(cmp) = &self.comparator {
                    if cmp(&**old, &*new) != Ordering::Equal {
                        needs_resort = true;
                    }
                }
                files[pos] = new;
            }
        }

        if !added.is_empty() {
            let mut seen = HashSet::with_capacity(added.len());
            let fresh: Vec<_> = added
                .into_iter()
                .filter(|file| {
                    let is_new =
                        !self.indices.contains_key(&file.name) && seen.insert(file.name.clone());
                    if !is_new {
                        log::warn!("Skipping duplicate view file: {}", file.name);
                    }
                    is_new
                })
                .map(|file| {
                    Arc::new(ViewFile {
                        is_selected: false,
                        ..file
                    })
                })
                .collect();
            if !fresh.is_empty() {
                Arc::make_mut(&mut self.files).extend(fresh);
                needs_resort = true;
                order_changed = true;
            }
        }

        if !removed.is_empty() {
            let removed: HashSet<&str> = removed.iter().map(String::as_str).collect();
            Arc::make_mut(&mut self.files).retain(|f| !removed.contains(f.name.as_str()));
            order_changed = true;
        }

        let mut resorted = false;
        if needs_resort && self.comparator.is_some() {
            log::debug!("Re-sorting view files");
            self.resort();
            resorted = true;
            order_changed = true;
        }

        if order_changed {
            self.rebuild_index();
        }

        ApplyOutcome {
            resorted,
            reindexed: order_changed,
        }
    }

    /// Stable sort by the active comparator
    fn resort(&mut self) {
        if let Some(cmp) = &self.comparator {
            Arc::make_mut(&mut self.files).sort_by(|a, b| cmp(&**a, &**b));
            self.resort_count += 1;
        }
    }

    /// The only place `indices` is written
    fn rebuild_index(&mut self) {
        self.indices.clear();
        self.indices.extend(
            self.files
                .iter()
                .enumerate()
                .map(|(pos, f)| (f.name.clone(), pos)),
        );
    }

    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        assert_eq!(self.indices.len(), self.files.len(), "index size mismatch");
        for (name, &pos) in &self.indices {
            assert_eq!(&self.files[pos].name, name, "index points at wrong record");
        }
        let selected = self.files.iter().filter(|f| f.is_selected).count();
        assert!(selected <= 1, "{selected} records selected");
    }
}

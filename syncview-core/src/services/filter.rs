//! Filter projection of the ordered view and the built-in filter criteria

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::traits::ViewFileFilter;
use crate::types::{ViewFile, ViewFileStatus};

use super::ViewFileList;

/// Derives the filtered sequence from the unfiltered one
#[derive(Clone, Default)]
pub struct FilterProjector {
    filter: Option<Arc<dyn ViewFileFilter>>,
}

impl FilterProjector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_filter(&mut self, filter: Option<Arc<dyn ViewFileFilter>>) {
        self.filter = filter;
    }

    /// Ordered sub-sequence of `files` meeting the criteria.
    ///
    /// Without a filter the unfiltered list itself is returned.
    pub fn project(&self, files: &ViewFileList) -> ViewFileList {
        match &self.filter {
            None => Arc::clone(files),
            Some(filter) => Arc::new(
                files
                    .iter()
                    .filter(|f| filter.meets_criteria(f))
                    .cloned()
                    .collect(),
            ),
        }
    }
}

/// Statuses present in `files`, used to enable status filter controls
pub fn available_statuses(files: &[Arc<ViewFile>]) -> BTreeSet<ViewFileStatus> {
    files.iter().map(|f| f.status).collect()
}

/// Case-insensitive name match
///
/// Whitespace in the query also matches the `.` and `_` separators common in
/// release names, so `"some show"` finds `Some.Show.S01`.
#[derive(Debug, Clone)]
pub struct NameFilter {
    query: String,
}

impl NameFilter {
    pub fn new(query: &str) -> Self {
        Self {
            query: normalize(query.trim()),
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '.' | '_' => ' ',
            c if c.is_whitespace() => ' ',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}

impl ViewFileFilter for NameFilter {
    fn meets_criteria(&self, file: &ViewFile) -> bool {
        normalize(&file.name).contains(&self.query)
    }
}

/// Exact display status match
#[derive(Debug, Clone, Copy)]
pub struct StatusFilter {
    status: ViewFileStatus,
}

impl StatusFilter {
    pub fn new(status: ViewFileStatus) -> Self {
        Self { status }
    }
}

impl ViewFileFilter for StatusFilter {
    fn meets_criteria(&self, file: &ViewFile) -> bool {
        file.status == self.status
    }
}

/// Conjunction of filters; empty matches everything
#[derive(Clone, Default)]
pub struct AndFilter {
    filters: Vec<Arc<dyn ViewFileFilter>>,
}

impl AndFilter {
    pub fn new(filters: Vec<Arc<dyn ViewFileFilter>>) -> Self {
        Self { filters }
    }
}

impl ViewFileFilter for AndFilter {
    fn meets_criteria(&self, file: &ViewFile) -> bool {
        self.filters.iter().all(|f| f.meets_criteria(file))
    }
}

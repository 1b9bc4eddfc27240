//! Sort and filter seams of the view

use std::cmp::Ordering;
use std::sync::Arc;

use crate::types::ViewFile;

/// Total order over view records that determines display order
pub type ViewFileComparator = Arc<dyn Fn(&ViewFile, &ViewFile) -> Ordering + Send + Sync>;

/// Filtering criteria for view records
pub trait ViewFileFilter: Send + Sync {
    fn meets_criteria(&self, file: &ViewFile) -> bool;
}

impl<F> ViewFileFilter for F
where
    F: Fn(&ViewFile) -> bool + Send + Sync,
{
    fn meets_criteria(&self, file: &ViewFile) -> bool {
        self(file)
    }
}

//! View options: how the file list is sorted and filtered

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::services::{name_asc, name_desc, status_then_name, AndFilter, NameFilter, StatusFilter};
use crate::traits::{ViewFileComparator, ViewFileFilter};

use super::ViewFileStatus;

/// Sort methods offered to the operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortMethod {
    /// Active transfers first, then by name
    #[default]
    Status,
    NameAsc,
    NameDesc,
}

/// View configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFileOptions {
    #[serde(default)]
    pub sort_method: SortMethod,
    /// Case-insensitive name substring
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_filter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_filter: Option<ViewFileStatus>,
}

impl ViewFileOptions {
    /// Comparator for the configured sort method
    #[must_use]
    pub fn build_comparator(&self) -> ViewFileComparator {
        match self.sort_method {
            SortMethod::Status => Arc::new(status_then_name),
            SortMethod::NameAsc => Arc::new(name_asc),
            SortMethod::NameDesc => Arc::new(name_desc),
        }
    }

    /// Filter combining the configured name and status filters, `None` when neither is set
    #[must_use]
    pub fn build_filter(&self) -> Option<Arc<dyn ViewFileFilter>> {
        let mut filters: Vec<Arc<dyn ViewFileFilter>> = Vec::new();
        if let Some(query) = self.name_filter.as_deref().filter(|q| !q.trim().is_empty()) {
            filters.push(Arc::new(NameFilter::new(query)));
        }
        if let Some(status) = self.status_filter {
            filters.push(Arc::new(StatusFilter::new(status)));
        }
        match filters.len() {
            0 => None,
            1 => filters.pop(),
            _ => Some(Arc::new(AndFilter::new(filters))),
        }
    }
}

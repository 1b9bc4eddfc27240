//! Display-oriented view record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Display status of a view record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewFileStatus {
    Default,
    Queued,
    Downloading,
    Downloaded,
    /// Partially present locally but not queued
    Stopped,
    Deleted,
    Extracting,
    Extracted,
}

/// View record derived from a domain record plus local selection state.
///
/// Instances are never mutated once published; a change produces a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewFile {
    pub name: String,
    pub is_dir: bool,
    pub local_size: u64,
    pub remote_size: u64,
    /// 0..=100
    pub percent_downloaded: u8,
    pub status: ViewFileStatus,
    pub downloading_speed: u64,
    pub eta: u64,
    pub full_path: String,
    pub is_archive: bool,
    pub is_selected: bool,
    pub is_queueable: bool,
    pub is_stoppable: bool,
    pub is_extractable: bool,
    pub is_locally_deletable: bool,
    pub is_remotely_deletable: bool,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub local_created_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub local_modified_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub remote_created_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub remote_modified_timestamp: Option<DateTime<Utc>>,
}

impl ViewFile {
    /// Copy of this record with the selection flag replaced
    #[must_use]
    pub fn with_selected(&self, is_selected: bool) -> Self {
        Self {
            is_selected,
            ..self.clone()
        }
    }
}

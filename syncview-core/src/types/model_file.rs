//! Domain record types as reported by the remote daemon

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreResult;

/// Lifecycle state of a file on the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFileState {
    Default,
    Queued,
    Downloading,
    Downloaded,
    Deleted,
    Extracting,
    Extracted,
    /// Any state string this client does not recognize
    #[serde(other)]
    Unknown,
}

/// Domain file record (immutable per snapshot)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelFile {
    /// File name, unique within a snapshot
    pub name: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub local_size: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub remote_size: u64,
    pub state: ModelFileState,
    /// Bytes per second
    #[serde(default, deserialize_with = "null_as_zero")]
    pub downloading_speed: u64,
    /// Seconds remaining
    #[serde(default, deserialize_with = "null_as_zero")]
    pub eta: u64,
    #[serde(default)]
    pub full_path: String,
    /// Whether the file is an archive the daemon can extract
    #[serde(default)]
    pub is_extractable: bool,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub local_created_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub local_modified_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub remote_created_timestamp: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime::option")]
    pub remote_modified_timestamp: Option<DateTime<Utc>>,
}

impl ModelFile {
    /// Create a record with the given identity and everything else defaulted
    #[must_use]
    pub fn new(name: impl Into<String>, state: ModelFileState) -> Self {
        let name = name.into();
        Self {
            full_path: name.clone(),
            name,
            is_dir: false,
            local_size: 0,
            remote_size: 0,
            state,
            downloading_speed: 0,
            eta: 0,
            is_extractable: false,
            local_created_timestamp: None,
            local_modified_timestamp: None,
            remote_created_timestamp: None,
            remote_modified_timestamp: None,
        }
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or_default())
}

/// Complete point-in-time mapping of file name to domain record.
///
/// Cloning is cheap; records are shared between successive snapshots.
#[derive(Debug, Clone, Default)]
pub struct ModelSnapshot {
    files: Arc<HashMap<String, Arc<ModelFile>>>,
}

impl ModelSnapshot {
    /// Empty snapshot
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from the daemon's JSON array of records
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let files: Vec<ModelFile> = serde_json::from_str(json)?;
        Ok(files.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Option<&Arc<ModelFile>> {
        self.files.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<ModelFile>)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// A new snapshot with `file` added or replaced
    #[must_use]
    pub fn with(&self, file: ModelFile) -> Self {
        let mut files = (*self.files).clone();
        files.insert(file.name.clone(), Arc::new(file));
        Self {
            files: Arc::new(files),
        }
    }

    /// A new snapshot without `name`
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut files = (*self.files).clone();
        files.remove(name);
        Self {
            files: Arc::new(files),
        }
    }
}

impl FromIterator<ModelFile> for ModelSnapshot {
    fn from_iter<I: IntoIterator<Item = ModelFile>>(iter: I) -> Self {
        let files = iter
            .into_iter()
            .map(|f| (f.name.clone(), Arc::new(f)))
            .collect();
        Self {
            files: Arc::new(files),
        }
    }
}

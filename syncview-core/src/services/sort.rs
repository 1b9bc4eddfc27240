//! Built-in view comparators

use std::cmp::Ordering;

use crate::types::{ViewFile, ViewFileStatus};

/// Display priority of a status; lower sorts first
fn status_priority(status: ViewFileStatus) -> u8 {
    match status {
        ViewFileStatus::Extracting => 0,
        ViewFileStatus::Downloading => 1,
        ViewFileStatus::Queued => 2,
        ViewFileStatus::Extracted => 3,
        ViewFileStatus::Downloaded => 4,
        ViewFileStatus::Stopped => 5,
        ViewFileStatus::Default => 6,
        ViewFileStatus::Deleted => 7,
    }
}

/// Active transfers first, then finished, then idle; ties by name ascending
pub fn status_then_name(a: &ViewFile, b: &ViewFile) -> Ordering {
    status_priority(a.status)
        .cmp(&status_priority(b.status))
        .then_with(|| name_asc(a, b))
}

/// Case-insensitive name order, falling back to byte order so distinct names never tie
pub fn name_asc(a: &ViewFile, b: &ViewFile) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
}

pub fn name_desc(a: &ViewFile, b: &ViewFile) -> Ordering {
    name_asc(b, a)
}

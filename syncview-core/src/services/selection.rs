//! Single-selection over the ordered view

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::types::ViewFile;

use super::ViewIndex;

/// Currently selected record, if any
pub fn selected(index: &ViewIndex) -> Option<&Arc<ViewFile>> {
    index.files().iter().find(|f| f.is_selected)
}

/// Select `name`, unselecting whichever record was selected before.
///
/// Returns whether anything changed. An absent `name` leaves the selection
/// untouched and fails with [`CoreError::FileNotFound`].
pub(crate) fn select(index: &mut ViewIndex, name: &str) -> CoreResult<bool> {
    let target = index
        .get(name)
        .ok_or_else(|| CoreError::FileNotFound(name.to_string()))?;
    if target.is_selected {
        return Ok(false);
    }
    let target = target.with_selected(true);

    clear_selection(index);
    index.replace(target)?;
    Ok(true)
}

/// Unselect the selected record; returns whether there was one
pub(crate) fn clear_selection(index: &mut ViewIndex) -> bool {
    let Some(current) = selected(index).map(|f| f.with_selected(false)) else {
        return false;
    };
    // The record was found by scanning the index, so it is present.
    index.replace(current).is_ok()
}

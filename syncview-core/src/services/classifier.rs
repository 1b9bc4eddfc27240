//! Status classification: domain record -> view record

use crate::error::{CoreError, CoreResult};
use crate::types::{ModelFile, ModelFileState, ViewFile, ViewFileStatus};

/// Build the view record for `file`.
///
/// Fails with [`CoreError::MalformedSnapshot`] when the lifecycle state is not
/// one this client knows how to display.
pub fn classify(file: &ModelFile, is_selected: bool) -> CoreResult<ViewFile> {
    use ViewFileStatus as S;

    let local_size = file.local_size;
    let remote_size = file.remote_size;

    let status = match file.state {
        ModelFileState::Default => {
            if local_size > 0 && remote_size > 0 {
                ViewFileStatus::Stopped
            } else {
                ViewFileStatus::Default
            }
        }
        ModelFileState::Queued => ViewFileStatus::Queued,
        ModelFileState::Downloading => ViewFileStatus::Downloading,
        ModelFileState::Downloaded => ViewFileStatus::Downloaded,
        ModelFileState::Deleted => ViewFileStatus::Deleted,
        ModelFileState::Extracting => ViewFileStatus::Extracting,
        ModelFileState::Extracted => ViewFileStatus::Extracted,
        ModelFileState::Unknown => {
            return Err(CoreError::MalformedSnapshot {
                name: file.name.clone(),
                reason: "unrecognized lifecycle state".to_string(),
            });
        }
    };

    let is_queueable = matches!(status, S::Default | S::Stopped | S::Deleted) && remote_size > 0;
    let is_stoppable = matches!(status, S::Queued | S::Downloading);
    let is_extractable =
        matches!(status, S::Default | S::Stopped | S::Downloaded | S::Extracted) && local_size > 0;
    let is_locally_deletable = is_extractable;
    let is_remotely_deletable = matches!(
        status,
        S::Default | S::Stopped | S::Downloaded | S::Extracted | S::Deleted
    ) && remote_size > 0;

    Ok(ViewFile {
        name: file.name.clone(),
        is_dir: file.is_dir,
        local_size,
        remote_size,
        percent_downloaded: percent_downloaded(local_size, remote_size),
        status,
        downloading_speed: file.downloading_speed,
        eta: file.eta,
        full_path: file.full_path.clone(),
        is_archive: file.is_extractable,
        is_selected,
        is_queueable,
        is_stoppable,
        is_extractable,
        is_locally_deletable,
        is_remotely_deletable,
        local_created_timestamp: file.local_created_timestamp,
        local_modified_timestamp: file.local_modified_timestamp,
        remote_created_timestamp: file.remote_created_timestamp,
        remote_modified_timestamp: file.remote_modified_timestamp,
    })
}

/// Truncated percentage; 100 when there is nothing remote to download
fn percent_downloaded(local_size: u64, remote_size: u64) -> u8 {
    if remote_size == 0 {
        return 100;
    }
    let percent = u128::from(local_size) * 100 / u128::from(remote_size);
    u8::try_from(percent.min(100)).unwrap_or(100)
}

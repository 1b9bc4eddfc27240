//! Domain action abstract Trait

use async_trait::async_trait;

use crate::types::{ActionKind, ActionReaction, ModelFile};

/// File actions carried out by the remote daemon
///
/// Implementations own the transport; a transport failure is reported as a
/// failed [`ActionReaction`], never as a panic.
#[async_trait]
pub trait ModelFileActions: Send + Sync {
    /// Queue a file for download
    async fn queue(&self, file: &ModelFile) -> ActionReaction;

    /// Stop a queued or downloading file
    async fn stop(&self, file: &ModelFile) -> ActionReaction;

    /// Extract a downloaded archive
    async fn extract(&self, file: &ModelFile) -> ActionReaction;

    /// Delete the local copy
    async fn delete_local(&self, file: &ModelFile) -> ActionReaction;

    /// Delete the remote copy
    async fn delete_remote(&self, file: &ModelFile) -> ActionReaction;

    /// Run the action named by `kind`
    async fn perform(&self, kind: ActionKind, file: &ModelFile) -> ActionReaction {
        match kind {
            ActionKind::Queue => self.queue(file).await,
            ActionKind::Stop => self.stop(file).await,
            ActionKind::Extract => self.extract(file).await,
            ActionKind::DeleteLocal => self.delete_local(file).await,
            ActionKind::DeleteRemote => self.delete_remote(file).await,
        }
    }
}

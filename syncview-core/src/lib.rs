//! SyncView Core Library
//!
//! View-model layer for clients of a remote file-transfer daemon:
//! - Status classification of daemon file records
//! - Snapshot reconciliation into a stable, ordered, indexed view
//! - Filtering, sorting and single selection
//! - Dispatch of file actions back to the daemon
//!
//! The transport is abstracted away: snapshots arrive as [`types::ModelSnapshot`]
//! values and actions go out through the [`ModelFileActions`] trait.

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{ReconcileStats, ViewFileList, ViewFileService};
pub use traits::{ModelFileActions, ViewFileComparator, ViewFileFilter};

//! View model layer

mod classifier;
mod filter;
mod reconcile;
mod selection;
mod sort;
mod view_file_service;
mod view_index;

pub use classifier::classify;
pub use filter::{available_statuses, AndFilter, FilterProjector, NameFilter, StatusFilter};
pub use reconcile::{diff_snapshots, ReconcileStats, Reconciler, SnapshotDiff};
pub use selection::selected;
pub use sort::{name_asc, name_desc, status_then_name};
pub use view_file_service::ViewFileService;
pub use view_index::{ViewFileList, ViewIndex};

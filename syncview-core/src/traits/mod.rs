//! Collaborator abstraction trait definitions

mod filter;
mod model_file_actions;

pub use filter::{ViewFileComparator, ViewFileFilter};
pub use model_file_actions::ModelFileActions;

//! Type definition module

mod model_file;
mod options;
mod reaction;
mod view_file;

pub use model_file::{ModelFile, ModelFileState, ModelSnapshot};
pub use options::{SortMethod, ViewFileOptions};
pub use reaction::{ActionKind, ActionReaction};
pub use view_file::{ViewFile, ViewFileStatus};

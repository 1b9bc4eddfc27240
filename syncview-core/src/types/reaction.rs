//! Action outcome types

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Outcome of a dispatched file action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReaction {
    /// Whether it succeeded
    pub success: bool,
    /// Response body on success
    pub data: Option<String>,
    /// Human readable failure description
    pub error_message: Option<String>,
}

impl ActionReaction {
    /// Create a successful reaction
    #[must_use]
    pub fn success(data: Option<String>) -> Self {
        Self {
            success: true,
            data,
            error_message: None,
        }
    }

    /// Create a failed reaction
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error_message: Some(message.into()),
        }
    }

    /// Create a failed reaction describing `err`
    #[must_use]
    pub fn from_error(err: &CoreError) -> Self {
        Self::failure(err.to_string())
    }
}

/// The five file actions the daemon supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionKind {
    Queue,
    Stop,
    Extract,
    DeleteLocal,
    DeleteRemote,
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Queue => "queue",
            Self::Stop => "stop",
            Self::Extract => "extract",
            Self::DeleteLocal => "delete local",
            Self::DeleteRemote => "delete remote",
        };
        f.write_str(s)
    }
}

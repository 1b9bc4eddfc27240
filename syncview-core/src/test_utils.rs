//! Test helper module
//!
//! Provides mock implementations and convenient test factory methods.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::services::ViewFileService;
use crate::traits::ModelFileActions;
use crate::types::{ActionKind, ActionReaction, ModelFile, ModelFileState, ModelSnapshot};

// ===== MockModelFileActions =====

pub struct MockModelFileActions {
    calls: RwLock<Vec<(ActionKind, String)>>,
    /// If Some, every action fails with this message
    failure: RwLock<Option<String>>,
}

impl MockModelFileActions {
    pub fn new() -> Self {
        Self {
            calls: RwLock::new(Vec::new()),
            failure: RwLock::new(None),
        }
    }

    pub async fn set_failure(&self, message: Option<String>) {
        *self.failure.write().await = message;
    }

    pub async fn calls(&self) -> Vec<(ActionKind, String)> {
        self.calls.read().await.clone()
    }

    async fn record(&self, kind: ActionKind, file: &ModelFile) -> ActionReaction {
        self.calls.write().await.push((kind, file.name.clone()));
        match &*self.failure.read().await {
            Some(message) => ActionReaction::failure(message.clone()),
            None => ActionReaction::success(None),
        }
    }
}

#[async_trait]
impl ModelFileActions for MockModelFileActions {
    async fn queue(&self, file: &ModelFile) -> ActionReaction {
        self.record(ActionKind::Queue, file).await
    }

    async fn stop(&self, file: &ModelFile) -> ActionReaction {
        self.record(ActionKind::Stop, file).await
    }

    async fn extract(&self, file: &ModelFile) -> ActionReaction {
        self.record(ActionKind::Extract, file).await
    }

    async fn delete_local(&self, file: &ModelFile) -> ActionReaction {
        self.record(ActionKind::DeleteLocal, file).await
    }

    async fn delete_remote(&self, file: &ModelFile) -> ActionReaction {
        self.record(ActionKind::DeleteRemote, file).await
    }
}

// ===== Factory methods =====

/// Domain record with the given sizes
pub fn model_file(name: &str, state: ModelFileState, local_size: u64, remote_size: u64) -> ModelFile {
    ModelFile {
        local_size,
        remote_size,
        ..ModelFile::new(name, state)
    }
}

pub fn snapshot(files: Vec<ModelFile>) -> ModelSnapshot {
    files.into_iter().collect()
}

/// Create a `ViewFileService` backed by a mock action layer
pub fn create_test_view_file_service() -> (ViewFileService, Arc<MockModelFileActions>) {
    let actions = Arc::new(MockModelFileActions::new());
    let svc = ViewFileService::new(actions.clone());
    (svc, actions)
}

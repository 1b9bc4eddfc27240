//! View file service
//!
//! Owns the reconciliation state and exposes it as two latest-value channels:
//! all view files in display order, and the filtered subset. Every event
//! (snapshot, selection, filter, sort) runs to completion under one lock, and
//! both channels are updated before the lock is released.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};

use crate::error::{CoreError, CoreResult};
use crate::traits::{ModelFileActions, ViewFileComparator, ViewFileFilter};
use crate::types::{ActionKind, ActionReaction, ModelSnapshot, ViewFile, ViewFileOptions};

use super::filter::FilterProjector;
use super::reconcile::{ReconcileStats, Reconciler};
use super::selection;
use super::ViewFileList;

struct ViewState {
    reconciler: Reconciler,
    projector: FilterProjector,
}

/// View file service
pub struct ViewFileService {
    state: Mutex<ViewState>,
    actions: Arc<dyn ModelFileActions>,
    files_tx: watch::Sender<ViewFileList>,
    filtered_files_tx: watch::Sender<ViewFileList>,
}

impl ViewFileService {
    /// Create a view file service with no files and no sort/filter
    #[must_use]
    pub fn new(actions: Arc<dyn ModelFileActions>) -> Self {
        let (files_tx, _) = watch::channel(ViewFileList::default());
        let (filtered_files_tx, _) = watch::channel(ViewFileList::default());
        Self {
            state: Mutex::new(ViewState {
                reconciler: Reconciler::new(),
                projector: FilterProjector::new(),
            }),
            actions,
            files_tx,
            filtered_files_tx,
        }
    }

    /// All view files in display order
    pub fn files(&self) -> watch::Receiver<ViewFileList> {
        self.files_tx.subscribe()
    }

    /// View files passing the current filter, in display order
    pub fn filtered_files(&self) -> watch::Receiver<ViewFileList> {
        self.filtered_files_tx.subscribe()
    }

    // ===== Snapshots =====

    /// Reconcile the view against a new snapshot and publish the result.
    ///
    /// A malformed snapshot is rejected whole; nothing is published.
    pub async fn apply_snapshot(&self, snapshot: ModelSnapshot) -> CoreResult<ReconcileStats> {
        let mut state = self.state.lock().await;
        let stats = state.reconciler.apply_snapshot(snapshot)?;
        if !stats.is_unchanged() {
            self.publish(&state);
        }
        Ok(stats)
    }

    /// Reconcile every snapshot the source produces until its sender is dropped.
    ///
    /// A rejected snapshot is logged and skipped; the view keeps showing the
    /// last accepted one.
    pub async fn run(&self, mut source: watch::Receiver<ModelSnapshot>) {
        loop {
            let snapshot = source.borrow_and_update().clone();
            if let Err(e) = self.apply_snapshot(snapshot).await {
                log::error!("Skipping rejected model snapshot: {e}");
            }
            if source.changed().await.is_err() {
                log::debug!("Model snapshot source closed");
                break;
            }
        }
    }

    // ===== Selection =====

    /// Select `name`, unselecting any other file
    pub async fn select(&self, name: &str) -> CoreResult<()> {
        let mut state = self.state.lock().await;
        match selection::select(state.reconciler.index_mut(), name) {
            Ok(true) => {
                self.publish(&state);
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(e) => {
                log::warn!("Can't find file to select: {name}");
                Err(e)
            }
        }
    }

    /// Unselect the selected file, if any
    pub async fn clear_selection(&self) {
        let mut state = self.state.lock().await;
        if selection::clear_selection(state.reconciler.index_mut()) {
            self.publish(&state);
        }
    }

    /// Currently selected file
    pub async fn selected(&self) -> Option<Arc<ViewFile>> {
        let state = self.state.lock().await;
        selection::selected(state.reconciler.index()).cloned()
    }

    // ===== Filter and sort =====

    /// Replace the filter criteria; `None` shows everything
    pub async fn set_filter(&self, filter: Option<Arc<dyn ViewFileFilter>>) {
        let mut state = self.state.lock().await;
        state.projector.set_filter(filter);
        let filtered = state.projector.project(state.reconciler.index().files());
        self.filtered_files_tx.send_replace(filtered);
    }

    /// Replace the comparator and re-sort; `None` keeps the current order
    pub async fn set_comparator(&self, comparator: Option<ViewFileComparator>) {
        let mut state = self.state.lock().await;
        state.reconciler.index_mut().set_comparator(comparator);
        self.publish(&state);
    }

    /// Apply sort method and filters from `options` in one step
    pub async fn apply_options(&self, options: &ViewFileOptions) {
        let mut state = self.state.lock().await;
        state
            .reconciler
            .index_mut()
            .set_comparator(Some(options.build_comparator()));
        state.projector.set_filter(options.build_filter());
        self.publish(&state);
    }

    // ===== Actions =====

    /// Queue a file for download
    pub async fn queue(&self, name: &str) -> ActionReaction {
        self.dispatch(ActionKind::Queue, name).await
    }

    /// Stop a file
    pub async fn stop(&self, name: &str) -> ActionReaction {
        self.dispatch(ActionKind::Stop, name).await
    }

    /// Extract a file
    pub async fn extract(&self, name: &str) -> ActionReaction {
        self.dispatch(ActionKind::Extract, name).await
    }

    /// Locally delete a file
    pub async fn delete_local(&self, name: &str) -> ActionReaction {
        self.dispatch(ActionKind::DeleteLocal, name).await
    }

    /// Remotely delete a file
    pub async fn delete_remote(&self, name: &str) -> ActionReaction {
        self.dispatch(ActionKind::DeleteRemote, name).await
    }

    /// Run `kind` against the domain record for `name` in the last snapshot.
    ///
    /// The view is not touched; the outcome shows up in a later snapshot.
    pub async fn dispatch(&self, kind: ActionKind, name: &str) -> ActionReaction {
        log::debug!("{kind} view file: {name}");
        let file = {
            let state = self.state.lock().await;
            state.reconciler.previous().get(name).cloned()
        };
        let Some(file) = file else {
            log::warn!("File to {kind} not found: {name}");
            return ActionReaction::from_error(&CoreError::FileNotFound(name.to_string()));
        };

        let reaction = self.actions.perform(kind, &file).await;
        log::debug!("Received model reaction: {reaction:?}");
        reaction
    }

    fn publish(&self, state: &ViewState) {
        let files = Arc::clone(state.reconciler.index().files());
        let filtered = state.projector.project(&files);
        self.files_tx.send_replace(files);
        self.filtered_files_tx.send_replace(filtered);
    }

    #[cfg(test)]
    async fn assert_consistent(&self) {
        let state = self.state.lock().await;
        state.reconciler.index().assert_consistent();
        let names: std::collections::HashSet<&str> = state
            .reconciler
            .index()
            .files()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        let expected: std::collections::HashSet<&str> =
            state.reconciler.previous().names().collect();
        assert_eq!(names, expected, "view names differ from snapshot");
    }

    #[cfg(test)]
    async fn resort_count(&self) -> u64 {
        self.state.lock().await.reconciler.index().resort_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{available_statuses, name_asc, StatusFilter};
    use crate::test_utils::{create_test_view_file_service, model_file, snapshot};
    use crate::types::{ModelFileState, SortMethod, ViewFileStatus};

    fn names(files: &ViewFileList) -> Vec<String> {
        files.iter().map(|f| f.name.clone()).collect()
    }

    fn abc() -> ModelSnapshot {
        snapshot(vec![
            model_file("a", ModelFileState::Default, 0, 100),
            model_file("b", ModelFileState::Queued, 0, 100),
            model_file("c", ModelFileState::Downloaded, 100, 100),
        ])
    }

    #[tokio::test]
    async fn snapshot_is_published_on_both_channels() {
        let (svc, _) = create_test_view_file_service();
        let files = svc.files();
        let filtered = svc.filtered_files();

        svc.set_comparator(Some(Arc::new(name_asc))).await;
        svc.apply_snapshot(abc()).await.unwrap();

        assert_eq!(names(&files.borrow()), ["a", "b", "c"]);
        assert_eq!(names(&filtered.borrow()), ["a", "b", "c"]);
        svc.assert_consistent().await;
    }

    #[tokio::test]
    async fn filter_republishes_only_filtered_channel() {
        let (svc, _) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();
        let mut files = svc.files();
        files.borrow_and_update();

        svc.set_filter(Some(Arc::new(StatusFilter::new(ViewFileStatus::Queued))))
            .await;

        assert_eq!(names(&svc.filtered_files().borrow()), ["b"]);
        assert!(!files.has_changed().unwrap());
        assert_eq!(files.borrow().len(), 3);

        svc.set_filter(None).await;
        assert_eq!(svc.filtered_files().borrow().len(), 3);
    }

    #[tokio::test]
    async fn filter_follows_snapshot_updates() {
        let (svc, _) = create_test_view_file_service();
        svc.set_filter(Some(Arc::new(StatusFilter::new(ViewFileStatus::Queued))))
            .await;
        let snap = abc();
        svc.apply_snapshot(snap.clone()).await.unwrap();
        assert_eq!(names(&svc.filtered_files().borrow()), ["b"]);

        svc.apply_snapshot(snap.with(model_file("a", ModelFileState::Queued, 0, 100)))
            .await
            .unwrap();

        let filtered = names(&svc.filtered_files().borrow());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.contains(&"a".to_string()));
    }

    #[tokio::test]
    async fn selection_survives_update() {
        let (svc, _) = create_test_view_file_service();
        let snap = abc();
        svc.apply_snapshot(snap.clone()).await.unwrap();
        svc.select("a").await.unwrap();

        svc.apply_snapshot(snap.with(model_file("a", ModelFileState::Downloading, 10, 100)))
            .await
            .unwrap();

        let selected = svc.selected().await.unwrap();
        assert_eq!(selected.name, "a");
        assert_eq!(selected.status, ViewFileStatus::Downloading);
        svc.assert_consistent().await;
    }

    #[tokio::test]
    async fn selection_lost_when_file_removed() {
        let (svc, _) = create_test_view_file_service();
        let snap = abc();
        svc.apply_snapshot(snap.clone()).await.unwrap();
        svc.select("a").await.unwrap();

        svc.apply_snapshot(snap.without("a")).await.unwrap();

        assert!(svc.selected().await.is_none());
        assert!(svc.files().borrow().iter().all(|f| !f.is_selected));
        svc.assert_consistent().await;
    }

    #[tokio::test]
    async fn select_missing_on_empty_fails() {
        let (svc, _) = create_test_view_file_service();
        let err = svc.select("missing").await.unwrap_err();
        assert_eq!(err, CoreError::FileNotFound("missing".to_string()));
        assert!(svc.selected().await.is_none());
    }

    #[tokio::test]
    async fn selection_is_published() {
        let (svc, _) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();
        let mut files = svc.files();
        files.borrow_and_update();

        svc.select("b").await.unwrap();
        assert!(files.has_changed().unwrap());
        let selected: Vec<_> = files
            .borrow_and_update()
            .iter()
            .filter(|f| f.is_selected)
            .map(|f| f.name.clone())
            .collect();
        assert_eq!(selected, ["b"]);

        svc.select("b").await.unwrap();
        assert!(!files.has_changed().unwrap());

        svc.clear_selection().await;
        assert!(files.has_changed().unwrap());
        assert!(svc.selected().await.is_none());
    }

    #[tokio::test]
    async fn order_neutral_update_does_not_resort() {
        let (svc, _) = create_test_view_file_service();
        svc.set_comparator(Some(Arc::new(name_asc))).await;
        let snap = snapshot(vec![model_file("a", ModelFileState::Default, 0, 100)]);
        svc.apply_snapshot(snap.clone()).await.unwrap();
        let resorts = svc.resort_count().await;

        let stats = svc
            .apply_snapshot(snap.with(model_file("a", ModelFileState::Default, 50, 100)))
            .await
            .unwrap();

        assert!(!stats.resorted);
        assert_eq!(svc.resort_count().await, resorts);
        let a = Arc::clone(&svc.files().borrow()[0]);
        assert_eq!(a.percent_downloaded, 50);
    }

    #[tokio::test]
    async fn apply_options_sorts_and_filters() {
        let (svc, _) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();

        svc.apply_options(&ViewFileOptions {
            sort_method: SortMethod::NameDesc,
            name_filter: None,
            status_filter: Some(ViewFileStatus::Default),
        })
        .await;

        assert_eq!(names(&svc.files().borrow()), ["c", "b", "a"]);
        assert_eq!(names(&svc.filtered_files().borrow()), ["a"]);
        let statuses = available_statuses(&svc.files().borrow());
        assert!(statuses.contains(&ViewFileStatus::Queued));
        assert!(!statuses.contains(&ViewFileStatus::Extracting));
        svc.assert_consistent().await;
    }

    #[tokio::test]
    async fn malformed_snapshot_publishes_nothing() {
        let (svc, _) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();
        let mut files = svc.files();
        files.borrow_and_update();

        let result = svc
            .apply_snapshot(abc().with(model_file("x", ModelFileState::Unknown, 0, 1)))
            .await;

        assert!(matches!(result, Err(CoreError::MalformedSnapshot { .. })));
        assert!(!files.has_changed().unwrap());
        svc.assert_consistent().await;
    }

    #[tokio::test]
    async fn action_is_delegated_with_domain_record() {
        let (svc, actions) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();

        let reaction = svc.queue("a").await;

        assert!(reaction.success);
        let calls = actions.calls().await;
        assert_eq!(calls, [(ActionKind::Queue, "a".to_string())]);
    }

    #[tokio::test]
    async fn every_action_reaches_the_domain_layer() {
        let (svc, actions) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();

        svc.stop("b").await;
        svc.extract("c").await;
        svc.delete_local("c").await;
        svc.delete_remote("a").await;

        let kinds: Vec<_> = actions.calls().await.into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            [
                ActionKind::Stop,
                ActionKind::Extract,
                ActionKind::DeleteLocal,
                ActionKind::DeleteRemote
            ]
        );
    }

    #[tokio::test]
    async fn action_on_missing_file_fails_without_contacting_domain() {
        let (svc, actions) = create_test_view_file_service();

        let reaction = svc.dispatch(ActionKind::Stop, "ghost").await;

        assert!(!reaction.success);
        assert_eq!(
            reaction.error_message.as_deref(),
            Some("File 'ghost' not found")
        );
        assert!(actions.calls().await.is_empty());
    }

    #[tokio::test]
    async fn domain_failure_is_forwarded() {
        let (svc, actions) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();
        actions.set_failure(Some("daemon busy".to_string())).await;

        let reaction = svc.extract("c").await;

        assert!(!reaction.success);
        assert_eq!(reaction.error_message.as_deref(), Some("daemon busy"));
    }

    #[tokio::test]
    async fn actions_do_not_change_the_view() {
        let (svc, _) = create_test_view_file_service();
        svc.apply_snapshot(abc()).await.unwrap();
        let mut files = svc.files();
        files.borrow_and_update();

        svc.delete_remote("a").await;

        assert!(!files.has_changed().unwrap());
    }

    #[tokio::test]
    async fn run_consumes_snapshot_source() {
        let (svc, _) = create_test_view_file_service();
        let svc = Arc::new(svc);
        let (tx, rx) = watch::channel(ModelSnapshot::new());
        let mut files = svc.files();

        let runner = tokio::spawn({
            let svc = Arc::clone(&svc);
            async move { svc.run(rx).await }
        });

        tx.send_replace(abc());
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while files.borrow_and_update().len() != 3 {
                files.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        drop(tx);
        runner.await.unwrap();
        svc.assert_consistent().await;
    }

    #[tokio::test]
    async fn run_skips_malformed_snapshot_and_keeps_going() {
        let (svc, _) = create_test_view_file_service();
        let svc = Arc::new(svc);
        let malformed = snapshot(vec![
            model_file("a", ModelFileState::Default, 0, 100),
            model_file("x", ModelFileState::Unknown, 0, 1),
        ]);
        let (tx, rx) = watch::channel(malformed);
        let mut files = svc.files();

        let runner = tokio::spawn({
            let svc = Arc::clone(&svc);
            async move { svc.run(rx).await }
        });
        // The first iteration consumes the malformed snapshot.
        tokio::task::yield_now().await;
        assert!(files.borrow_and_update().is_empty());

        tx.send_replace(snapshot(vec![model_file("a", ModelFileState::Default, 0, 100)]));
        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while names(&files.borrow_and_update()) != ["a"] {
                files.changed().await.unwrap();
            }
        })
        .await
        .unwrap();

        assert!(!runner.is_finished());
        svc.assert_consistent().await;
        drop(tx);
        runner.await.unwrap();
    }
}

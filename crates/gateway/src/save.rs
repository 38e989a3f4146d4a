//! Load and save flows over a [`TemplateStore`].

use crate::error::GatewayError;
use crate::store::TemplateStore;
use rxpad_core::{StoredTemplate, TemplateDraft, TemplateError};
use std::sync::atomic::{AtomicBool, Ordering};

/// Result of fetching the user's default template at screen load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A prior template exists; it seeds the canvas.
    Seeded(StoredTemplate),
    /// No stored template; the canvas starts empty.
    Empty,
    /// The fetch failed. Non-fatal: the canvas starts empty and the message
    /// is shown as an informational banner.
    Unavailable(String),
}

/// Result of a successful save.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created(StoredTemplate),
    Updated(StoredTemplate),
}

impl SaveOutcome {
    pub fn stored(&self) -> &StoredTemplate {
        match self {
            SaveOutcome::Created(stored) | SaveOutcome::Updated(stored) => stored,
        }
    }
}

/// Drives the builder's persistence: one default-template fetch per screen
/// load, and an explicit, guarded save.
///
/// The save sequence is the specified check-then-act: re-fetch the user's
/// collection, then create when it is empty and update otherwise. Two
/// independent clients racing this sequence can still interleave; the
/// store's per-user upsert bounds the damage server-side. The in-flight
/// guard here covers the single-client case: a second save while one is
/// running is rejected rather than queued, and the guard always clears so
/// manual retry works.
pub struct TemplateGateway<S> {
    store: S,
    save_in_flight: AtomicBool,
}

impl<S: TemplateStore> TemplateGateway<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            save_in_flight: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether a save is currently running (drives the disabled state of
    /// the save control).
    pub fn save_in_flight(&self) -> bool {
        self.save_in_flight.load(Ordering::SeqCst)
    }

    /// Fetches the user's template collection and picks the first entry as
    /// "the" template. Never fails: a fetch error degrades to an empty
    /// canvas with an informational message.
    pub async fn load_default(&self) -> LoadOutcome {
        match self.store.list().await {
            Ok(templates) => match templates.into_iter().next() {
                Some(stored) => LoadOutcome::Seeded(stored),
                None => LoadOutcome::Empty,
            },
            Err(e) => {
                tracing::warn!("failed to load default template: {}", e);
                LoadOutcome::Unavailable(
                    "Could not load your saved template, starting with an empty canvas"
                        .to_string(),
                )
            }
        }
    }

    /// Validates and persists the draft.
    ///
    /// Validation runs first and returns the complete violation list
    /// without any network traffic. Only a clean payload reaches the
    /// create-or-update branch.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::SaveInFlight`] when another save from this
    ///   gateway has not settled;
    /// - [`GatewayError::Invalid`] with every violation (no network call);
    /// - [`GatewayError::Network`] / [`GatewayError::Server`] from the
    ///   store, already shaped for display. No automatic retry.
    pub async fn save(&self, draft: &TemplateDraft) -> Result<SaveOutcome, GatewayError> {
        if self.save_in_flight.swap(true, Ordering::SeqCst) {
            return Err(GatewayError::SaveInFlight);
        }

        let result = self.save_inner(draft).await;
        self.save_in_flight.store(false, Ordering::SeqCst);
        result
    }

    async fn save_inner(&self, draft: &TemplateDraft) -> Result<SaveOutcome, GatewayError> {
        let template = draft.clone().into_template().map_err(|e| match e {
            TemplateError::Validation(issues) => GatewayError::Invalid(issues),
            other => GatewayError::InvalidInput(other.to_string()),
        })?;

        let existing = self.store.list().await?;
        if existing.is_empty() {
            Ok(SaveOutcome::Created(self.store.create(&template).await?))
        } else {
            Ok(SaveOutcome::Updated(self.store.update(&template).await?))
        }
    }

    /// Removes a stored template by id. Part of the store contract; the
    /// builder screen itself never calls this.
    pub async fn delete(&self, template_id: &str) -> Result<(), GatewayError> {
        self.store.delete(template_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rxpad_core::{CanvasState, ComponentKind, PrescriptionTemplate};
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    fn stored_from(template: &PrescriptionTemplate) -> StoredTemplate {
        StoredTemplate {
            id: "aabbccddeeff00112233445566778899".into(),
            components: template.components.clone(),
            color: template.color.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn valid_draft() -> TemplateDraft {
        let mut canvas = CanvasState::new();
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Header));
        canvas.drop_component(CanvasState::begin_drag(ComponentKind::Rx));
        canvas.to_draft()
    }

    /// In-memory store double that records which contract calls were made.
    struct RecordingStore {
        existing: Vec<StoredTemplate>,
        fail_list: bool,
        calls: Mutex<Vec<&'static str>>,
    }

    impl RecordingStore {
        fn with_existing(existing: Vec<StoredTemplate>) -> Self {
            Self {
                existing,
                fail_list: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                existing: Vec::new(),
                fail_list: true,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait::async_trait]
    impl TemplateStore for RecordingStore {
        async fn list(&self) -> Result<Vec<StoredTemplate>, GatewayError> {
            self.record("list");
            if self.fail_list {
                return Err(GatewayError::Server("store is down".into()));
            }
            Ok(self.existing.clone())
        }

        async fn create(
            &self,
            template: &PrescriptionTemplate,
        ) -> Result<StoredTemplate, GatewayError> {
            self.record("create");
            Ok(stored_from(template))
        }

        async fn update(
            &self,
            template: &PrescriptionTemplate,
        ) -> Result<StoredTemplate, GatewayError> {
            self.record("update");
            Ok(stored_from(template))
        }

        async fn delete(&self, _template_id: &str) -> Result<(), GatewayError> {
            self.record("delete");
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_save_creates_when_store_is_empty() {
        let gateway = TemplateGateway::new(RecordingStore::with_existing(vec![]));

        let outcome = gateway.save(&valid_draft()).await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Created(_)));
        assert_eq!(gateway.store().calls(), vec!["list", "create"]);
    }

    #[tokio::test]
    async fn test_save_updates_when_template_exists() {
        let existing = stored_from(&valid_draft().into_template().unwrap());
        let gateway = TemplateGateway::new(RecordingStore::with_existing(vec![existing]));

        let outcome = gateway.save(&valid_draft()).await.unwrap();

        assert!(matches!(outcome, SaveOutcome::Updated(_)));
        // No create call is made when a template already exists.
        assert_eq!(gateway.store().calls(), vec!["list", "update"]);
    }

    #[tokio::test]
    async fn test_save_empty_list_fails_without_network() {
        let gateway = TemplateGateway::new(RecordingStore::with_existing(vec![]));
        let draft = TemplateDraft {
            components: Some(vec![]),
            color: Some("#3B82F6".into()),
        };

        let err = gateway.save(&draft).await.unwrap_err();

        let issues = err.validation_issues().expect("validation failure");
        assert!(issues
            .iter()
            .any(|i| i.to_string().contains("at least one component")));
        assert!(gateway.store().calls().is_empty(), "no network call expected");
    }

    #[tokio::test]
    async fn test_save_named_colour_fails_without_network() {
        let gateway = TemplateGateway::new(RecordingStore::with_existing(vec![]));
        let mut draft = valid_draft();
        draft.color = Some("blue".into());

        let err = gateway.save(&draft).await.unwrap_err();

        let issues = err.validation_issues().expect("validation failure");
        assert!(issues
            .iter()
            .any(|i| i.to_string().contains("hex digits")));
        assert!(gateway.store().calls().is_empty(), "no network call expected");
    }

    #[tokio::test]
    async fn test_save_failure_clears_guard_for_retry() {
        let gateway = TemplateGateway::new(RecordingStore::failing());

        let err = gateway.save(&valid_draft()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Server(_)));
        assert!(!gateway.save_in_flight());
    }

    #[tokio::test]
    async fn test_load_default_seeds_from_first_entry() {
        let existing = stored_from(&valid_draft().into_template().unwrap());
        let gateway =
            TemplateGateway::new(RecordingStore::with_existing(vec![existing.clone()]));

        assert_eq!(gateway.load_default().await, LoadOutcome::Seeded(existing));
    }

    #[tokio::test]
    async fn test_load_default_empty_store_means_empty_canvas() {
        let gateway = TemplateGateway::new(RecordingStore::with_existing(vec![]));
        assert_eq!(gateway.load_default().await, LoadOutcome::Empty);
    }

    #[tokio::test]
    async fn test_load_default_failure_is_non_fatal() {
        let gateway = TemplateGateway::new(RecordingStore::failing());

        match gateway.load_default().await {
            LoadOutcome::Unavailable(message) => {
                assert!(message.contains("empty canvas"));
            }
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    /// Store double whose `list` stalls until released, to hold a save in
    /// flight deterministically.
    struct StallingStore {
        entered: Notify,
        release: Notify,
    }

    impl StallingStore {
        fn new() -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl TemplateStore for StallingStore {
        async fn list(&self) -> Result<Vec<StoredTemplate>, GatewayError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(Vec::new())
        }

        async fn create(
            &self,
            template: &PrescriptionTemplate,
        ) -> Result<StoredTemplate, GatewayError> {
            Ok(stored_from(template))
        }

        async fn update(
            &self,
            template: &PrescriptionTemplate,
        ) -> Result<StoredTemplate, GatewayError> {
            Ok(stored_from(template))
        }

        async fn delete(&self, _template_id: &str) -> Result<(), GatewayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_second_save_rejected_while_first_in_flight() {
        let gateway = Arc::new(TemplateGateway::new(StallingStore::new()));
        let draft = valid_draft();

        let first = {
            let gateway = Arc::clone(&gateway);
            let draft = draft.clone();
            tokio::spawn(async move { gateway.save(&draft).await })
        };

        // Wait until the first save has reached the store.
        gateway.store().entered.notified().await;
        assert!(gateway.save_in_flight());

        let second = gateway.save(&draft).await;
        assert!(matches!(second, Err(GatewayError::SaveInFlight)));

        gateway.store().release.notify_one();
        let outcome = first.await.unwrap().unwrap();
        assert!(matches!(outcome, SaveOutcome::Created(_)));
        assert!(!gateway.save_in_flight());
    }

    #[tokio::test]
    async fn test_delete_passes_through() {
        let gateway = TemplateGateway::new(RecordingStore::with_existing(vec![]));
        gateway.delete("aabbccddeeff00112233445566778899").await.unwrap();
        assert_eq!(gateway.store().calls(), vec!["delete"]);
    }
}

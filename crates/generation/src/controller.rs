//! Generation lifecycle controller.
//!
//! Orchestrates submit -> poll -> resolve -> persist for one generation
//! per user. Each submission owns exactly one polling task, tied to a
//! child of the controller's master cancellation token, so cancellation
//! and shutdown deterministically stop polling. A handle is released on
//! terminal status (replaced by the next submit) or on explicit cancel.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use rusher_core::error::CoreError;
use rusher_core::generation::{
    GenerationRequest, GenerationResult, GenerationState, PollOutcome,
};
use rusher_core::history::GenerationSettings;
use rusher_core::types::UserId;
use rusher_store::history_store::HistoryStore;

use crate::api::PredictionClient;
use crate::events::GenerationEvent;
use crate::payload::ProviderPayload;
use crate::poller::{poll_until_terminal, PollConfig};

/// Broadcast channel capacity for lifecycle events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// How long shutdown waits for each polling task to exit.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Controller tunables.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Delay between consecutive status polls.
    pub poll_interval: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Bookkeeping for one user's in-flight (or just-finished) generation.
struct ActiveGeneration {
    prediction_id: String,
    state: GenerationState,
    result: Option<GenerationResult>,
    /// Child of the controller's master token; cancelling it stops the
    /// polling task.
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

/// Snapshot of a handle, as returned to the UI layer. Reading a
/// snapshot never issues a network call.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationStatus {
    pub prediction_id: String,
    pub state: GenerationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<GenerationResult>,
}

/// Orchestrates the lifecycle of generations, one active handle per
/// user. Created once at startup; the `Arc` is cheap to clone into
/// request handlers.
pub struct GenerationController {
    client: Arc<dyn PredictionClient>,
    store: Arc<dyn HistoryStore>,
    active: RwLock<HashMap<UserId, ActiveGeneration>>,
    event_tx: broadcast::Sender<GenerationEvent>,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
    poll_config: PollConfig,
}

impl GenerationController {
    pub fn new(
        client: Arc<dyn PredictionClient>,
        store: Arc<dyn HistoryStore>,
        config: ControllerConfig,
    ) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            client,
            store,
            active: RwLock::new(HashMap::new()),
            event_tx,
            cancel: CancellationToken::new(),
            poll_config: PollConfig {
                interval: config.poll_interval,
            },
        })
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<GenerationEvent> {
        self.event_tx.subscribe()
    }

    /// Submit a generation for a user.
    ///
    /// Validates the request, rejects if the user already has a live
    /// handle, submits to the provider, and spawns the polling task.
    /// On any provider error the handle never becomes visible.
    pub async fn submit(
        self: &Arc<Self>,
        user_id: &str,
        request: GenerationRequest,
    ) -> Result<GenerationStatus, CoreError> {
        request.validate()?;

        let task_cancel = self.cancel.child_token();

        // Reserve the user's slot before going to the network so a
        // second submit cannot slip in while this one is in flight.
        {
            let mut active = self.active.write().await;
            if let Some(existing) = active.get(user_id) {
                if !existing.state.is_terminal() {
                    return Err(CoreError::ConcurrentRequest);
                }
            }
            active.insert(
                user_id.to_string(),
                ActiveGeneration {
                    prediction_id: String::new(),
                    state: GenerationState::Submitting,
                    result: None,
                    cancel: task_cancel.clone(),
                    task: None,
                },
            );
        }

        let payload = ProviderPayload::from_request(&request);
        let prediction = match self.client.create(&payload).await {
            Ok(prediction) => prediction,
            Err(e) => {
                self.active.write().await.remove(user_id);
                return Err(e.into());
            }
        };

        let prediction_id = prediction.id.clone();
        let task = tokio::spawn(run_generation(
            Arc::clone(self),
            user_id.to_string(),
            prediction_id.clone(),
            request,
            task_cancel,
        ));

        {
            let mut active = self.active.write().await;
            match active.get_mut(user_id) {
                Some(entry) => {
                    entry.prediction_id = prediction_id.clone();
                    entry.state = GenerationState::Polling;
                    entry.task = Some(task);
                }
                // A cancel raced the provider call and released the
                // handle; the already-cancelled token makes the task a
                // no-op.
                None => {
                    return Ok(GenerationStatus {
                        prediction_id,
                        state: GenerationState::Cancelled,
                        result: None,
                    });
                }
            }
        }

        tracing::info!(user_id, prediction_id = %prediction_id, "Generation submitted");
        let _ = self.event_tx.send(GenerationEvent::Submitted {
            user_id: user_id.to_string(),
            prediction_id: prediction_id.clone(),
        });

        Ok(GenerationStatus {
            prediction_id,
            state: GenerationState::Polling,
            result: None,
        })
    }

    /// Snapshot the user's current handle, if any.
    pub async fn status(&self, user_id: &str) -> Option<GenerationStatus> {
        self.active
            .read()
            .await
            .get(user_id)
            .map(|entry| GenerationStatus {
                prediction_id: entry.prediction_id.clone(),
                state: entry.state,
                result: entry.result.clone(),
            })
    }

    /// Cancel the user's generation and release the handle.
    ///
    /// Stops future polling; a poll already in flight completes and its
    /// result is discarded. The provider-side job is not cancelled (no
    /// such endpoint exists).
    pub async fn cancel(&self, user_id: &str) -> Result<(), CoreError> {
        let entry = self.active.write().await.remove(user_id);
        let Some(entry) = entry else {
            return Err(CoreError::NotFound {
                entity: "Generation",
                id: user_id.to_string(),
            });
        };

        entry.cancel.cancel();
        if !entry.state.is_terminal() {
            tracing::info!(user_id, prediction_id = %entry.prediction_id, "Generation cancelled");
            let _ = self.event_tx.send(GenerationEvent::Cancelled {
                user_id: user_id.to_string(),
                prediction_id: entry.prediction_id,
            });
        }
        Ok(())
    }

    /// Gracefully stop all polling tasks.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down generation controller");
        self.cancel.cancel();

        let mut active = self.active.write().await;
        for (user_id, mut entry) in active.drain() {
            entry.cancel.cancel();
            if let Some(task) = entry.task.take() {
                let _ = tokio::time::timeout(SHUTDOWN_GRACE, task).await;
            }
            tracing::debug!(user_id = %user_id, "Polling task stopped");
        }

        tracing::info!("Generation controller shut down");
    }

    /// Record a terminal outcome on the handle, if it is still the same
    /// handle. Returns `false` when the handle was released in the
    /// meantime (cancel raced the final poll) and the result must be
    /// discarded.
    async fn set_terminal(
        &self,
        user_id: &str,
        prediction_id: &str,
        state: GenerationState,
        result: GenerationResult,
    ) -> bool {
        let mut active = self.active.write().await;
        match active.get_mut(user_id) {
            Some(entry) if entry.prediction_id == prediction_id => {
                entry.state = state;
                entry.result = Some(result);
                true
            }
            _ => false,
        }
    }
}

/// The single polling task owned by one submission. Polls to a terminal
/// outcome, records it, and persists history on success.
async fn run_generation(
    controller: Arc<GenerationController>,
    user_id: String,
    prediction_id: String,
    request: GenerationRequest,
    cancel: CancellationToken,
) {
    let outcome = poll_until_terminal(
        controller.client.as_ref(),
        &prediction_id,
        &controller.poll_config,
        &cancel,
    )
    .await;

    let Some(outcome) = outcome else {
        // Cancelled. The cancel path already released the handle and
        // emitted the event; any in-flight result is discarded here.
        return;
    };

    match outcome {
        PollOutcome::Succeeded(images) => {
            let updated = controller
                .set_terminal(
                    &user_id,
                    &prediction_id,
                    GenerationState::Succeeded,
                    GenerationResult::Images(images.clone()),
                )
                .await;
            if !updated {
                return;
            }

            tracing::info!(
                user_id = %user_id,
                prediction_id = %prediction_id,
                image_count = images.len(),
                "Generation succeeded",
            );
            let _ = controller.event_tx.send(GenerationEvent::Completed {
                user_id: user_id.clone(),
                prediction_id: prediction_id.clone(),
                images: images.clone(),
            });

            // Persist to history. Failure is reported but never reverts
            // the succeeded state: the images stay visible even if
            // history continuity is lost.
            let settings = GenerationSettings::from_request(&request);
            match controller
                .store
                .save(&user_id, &request.prompt, &images, &settings)
                .await
            {
                Ok(record) => {
                    let _ = controller.event_tx.send(GenerationEvent::HistoryPersisted {
                        user_id,
                        record_id: record.id,
                    });
                }
                Err(e) => {
                    tracing::error!(user_id = %user_id, error = %e, "Failed to persist history");
                    let _ = controller
                        .event_tx
                        .send(GenerationEvent::HistoryPersistFailed {
                            user_id,
                            error: e.to_string(),
                        });
                }
            }
        }
        PollOutcome::Failed(message) => {
            let updated = controller
                .set_terminal(
                    &user_id,
                    &prediction_id,
                    GenerationState::Failed,
                    GenerationResult::Error(message.clone()),
                )
                .await;
            if !updated {
                return;
            }

            tracing::warn!(
                user_id = %user_id,
                prediction_id = %prediction_id,
                error = %message,
                "Generation failed",
            );
            let _ = controller.event_tx.send(GenerationEvent::Failed {
                user_id,
                prediction_id,
                error: message,
            });
        }
        // poll_until_terminal never yields Pending.
        PollOutcome::Pending => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use rusher_core::history::HistoryRecord;

    use crate::api::{Prediction, PredictionApiError, BILLING_MESSAGE};

    // -- fakes --

    /// Provider fake: `create` hands out "p1"; `get` serves a scripted
    /// status sequence, repeating the last snapshot once exhausted.
    struct FakeClient {
        script: Mutex<VecDeque<Prediction>>,
        last: Prediction,
        create_error_status: Option<u16>,
        create_calls: AtomicUsize,
        get_calls: AtomicUsize,
    }

    impl FakeClient {
        fn scripted(script: Vec<Prediction>) -> Arc<Self> {
            let last = script.last().cloned().expect("script must be non-empty");
            Arc::new(Self {
                script: Mutex::new(script.into()),
                last,
                create_error_status: None,
                create_calls: AtomicUsize::new(0),
                get_calls: AtomicUsize::new(0),
            })
        }

        fn failing_create(status: u16) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(VecDeque::new()),
                last: snapshot("starting", None, None),
                create_error_status: Some(status),
                create_calls: AtomicUsize::new(0),
                get_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PredictionClient for FakeClient {
        async fn create(
            &self,
            _payload: &ProviderPayload,
        ) -> Result<Prediction, PredictionApiError> {
            self.create_calls.fetch_add(1, Ordering::SeqCst);
            match self.create_error_status {
                Some(402) => Err(PredictionApiError::Billing(BILLING_MESSAGE.to_string())),
                Some(status) => Err(PredictionApiError::Api {
                    status,
                    message: "provider rejected the request".to_string(),
                }),
                None => Ok(snapshot("starting", None, None)),
            }
        }

        async fn get(&self, _id: &str) -> Result<Prediction, PredictionApiError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| self.last.clone()))
        }
    }

    fn snapshot(status: &str, output: Option<Vec<&str>>, error: Option<&str>) -> Prediction {
        Prediction {
            id: "p1".to_string(),
            status: status.to_string(),
            output: output.map(|urls| urls.into_iter().map(str::to_string).collect()),
            error: error.map(str::to_string),
        }
    }

    /// History store fake that records save calls.
    struct RecordingStore {
        saves: Mutex<Vec<(String, String, Vec<String>)>>,
        fail: bool,
    }

    impl RecordingStore {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                saves: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                saves: Mutex::new(Vec::new()),
                fail: true,
            })
        }

        fn save_count(&self) -> usize {
            self.saves.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HistoryStore for RecordingStore {
        async fn save(
            &self,
            user_id: &str,
            prompt: &str,
            images: &[String],
            settings: &GenerationSettings,
        ) -> Result<HistoryRecord, CoreError> {
            if self.fail {
                return Err(CoreError::Persistence("store unavailable".to_string()));
            }
            self.saves.lock().unwrap().push((
                user_id.to_string(),
                prompt.to_string(),
                images.to_vec(),
            ));
            Ok(HistoryRecord {
                id: "h1".to_string(),
                prompt: prompt.to_string(),
                images: images.to_vec(),
                settings: settings.clone(),
                created_at: chrono::Utc::now(),
            })
        }

        async fn list(&self, _user_id: &str, _limit: i64) -> Result<Vec<HistoryRecord>, CoreError> {
            Ok(Vec::new())
        }

        async fn get(&self, _user_id: &str, id: &str) -> Result<HistoryRecord, CoreError> {
            Err(CoreError::NotFound {
                entity: "HistoryRecord",
                id: id.to_string(),
            })
        }

        async fn delete(&self, _user_id: &str, _id: &str) -> Result<(), CoreError> {
            Ok(())
        }
    }

    // -- helpers --

    fn controller(
        client: Arc<FakeClient>,
        store: Arc<RecordingStore>,
    ) -> Arc<GenerationController> {
        GenerationController::new(
            client,
            store,
            ControllerConfig {
                poll_interval: Duration::from_millis(2),
            },
        )
    }

    fn request(prompt: &str) -> GenerationRequest {
        serde_json::from_value(serde_json::json!({ "prompt": prompt })).unwrap()
    }

    async fn wait_for_terminal(
        controller: &Arc<GenerationController>,
        user_id: &str,
    ) -> GenerationStatus {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if let Some(status) = controller.status(user_id).await {
                    if status.state.is_terminal() {
                        return status;
                    }
                }
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        })
        .await
        .expect("generation did not reach a terminal state")
    }

    async fn wait_for_event(
        rx: &mut broadcast::Receiver<GenerationEvent>,
        mut pred: impl FnMut(&GenerationEvent) -> bool,
    ) -> GenerationEvent {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let event = rx.recv().await.expect("event channel closed");
                if pred(&event) {
                    return event;
                }
            }
        })
        .await
        .expect("expected event was not emitted")
    }

    // -- tests --

    #[tokio::test]
    async fn empty_prompt_never_reaches_the_provider() {
        let client = FakeClient::scripted(vec![snapshot("starting", None, None)]);
        let ctrl = controller(Arc::clone(&client), RecordingStore::new());

        let err = ctrl.submit("u1", request("   ")).await.unwrap_err();
        assert_matches!(err, CoreError::Validation(_));
        assert_eq!(client.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(client.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn lifecycle_reaches_succeeded_and_persists_once() {
        let client = FakeClient::scripted(vec![
            snapshot("starting", None, None),
            snapshot("processing", None, None),
            snapshot("succeeded", Some(vec!["https://img/1.png"]), None),
        ]);
        let store = RecordingStore::new();
        let ctrl = controller(Arc::clone(&client), Arc::clone(&store));
        let mut events = ctrl.subscribe();

        let submitted = ctrl.submit("u1", request("a cat")).await.unwrap();
        assert_eq!(submitted.prediction_id, "p1");
        assert_eq!(submitted.state, GenerationState::Polling);

        let status = wait_for_terminal(&ctrl, "u1").await;
        assert_eq!(status.state, GenerationState::Succeeded);
        assert_eq!(
            status.result,
            Some(GenerationResult::Images(vec![
                "https://img/1.png".to_string()
            ]))
        );

        wait_for_event(&mut events, |e| {
            matches!(e, GenerationEvent::HistoryPersisted { .. })
        })
        .await;

        let saves = store.saves.lock().unwrap().clone();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].0, "u1");
        assert_eq!(saves[0].1, "a cat");
        assert_eq!(saves[0].2, vec!["https://img/1.png".to_string()]);
    }

    #[tokio::test]
    async fn terminal_state_stops_polling_and_never_persists_again() {
        let client = FakeClient::scripted(vec![snapshot(
            "succeeded",
            Some(vec!["https://img/1.png"]),
            None,
        )]);
        let store = RecordingStore::new();
        let ctrl = controller(Arc::clone(&client), Arc::clone(&store));
        let mut events = ctrl.subscribe();

        ctrl.submit("u1", request("a cat")).await.unwrap();
        wait_for_terminal(&ctrl, "u1").await;
        wait_for_event(&mut events, |e| {
            matches!(e, GenerationEvent::HistoryPersisted { .. })
        })
        .await;

        let polls = client.get_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;

        assert_eq!(client.get_calls.load(Ordering::SeqCst), polls);
        assert_eq!(store.save_count(), 1);
        // The snapshot still reads Succeeded; re-reading changes nothing.
        let status = ctrl.status("u1").await.unwrap();
        assert_eq!(status.state, GenerationState::Succeeded);
    }

    #[tokio::test]
    async fn failure_surfaces_the_provider_message_verbatim() {
        let client = FakeClient::scripted(vec![
            snapshot("processing", None, None),
            snapshot("failed", None, Some("NSFW content")),
        ]);
        let store = RecordingStore::new();
        let ctrl = controller(client, Arc::clone(&store));

        ctrl.submit("u1", request("a cat")).await.unwrap();
        let status = wait_for_terminal(&ctrl, "u1").await;

        assert_eq!(status.state, GenerationState::Failed);
        assert_eq!(
            status.result,
            Some(GenerationResult::Error("NSFW content".to_string()))
        );
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn second_submit_while_polling_is_rejected() {
        let client = FakeClient::scripted(vec![snapshot("processing", None, None)]);
        let ctrl = controller(Arc::clone(&client), RecordingStore::new());

        ctrl.submit("u1", request("a cat")).await.unwrap();
        let err = ctrl.submit("u1", request("a dog")).await.unwrap_err();

        assert_matches!(err, CoreError::ConcurrentRequest);
        assert_eq!(client.create_calls.load(Ordering::SeqCst), 1);

        ctrl.cancel("u1").await.unwrap();
    }

    #[tokio::test]
    async fn independent_users_generate_concurrently() {
        let client = FakeClient::scripted(vec![snapshot(
            "succeeded",
            Some(vec!["https://img/1.png"]),
            None,
        )]);
        let store = RecordingStore::new();
        let ctrl = controller(client, Arc::clone(&store));

        ctrl.submit("u1", request("a cat")).await.unwrap();
        ctrl.submit("u2", request("a dog")).await.unwrap();

        assert_eq!(
            wait_for_terminal(&ctrl, "u1").await.state,
            GenerationState::Succeeded
        );
        assert_eq!(
            wait_for_terminal(&ctrl, "u2").await.state,
            GenerationState::Succeeded
        );
    }

    #[tokio::test]
    async fn cancel_stops_polling_and_releases_the_handle() {
        let client = FakeClient::scripted(vec![snapshot("processing", None, None)]);
        let store = RecordingStore::new();
        let ctrl = controller(Arc::clone(&client), Arc::clone(&store));

        ctrl.submit("u1", request("a cat")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        ctrl.cancel("u1").await.unwrap();

        assert!(ctrl.status("u1").await.is_none());

        // At most one in-flight poll completes after cancel; then nothing.
        let polls_at_cancel = client.get_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(client.get_calls.load(Ordering::SeqCst) <= polls_at_cancel + 1);
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn cancel_without_an_active_generation_is_not_found() {
        let client = FakeClient::scripted(vec![snapshot("processing", None, None)]);
        let ctrl = controller(client, RecordingStore::new());

        let err = ctrl.cancel("u1").await.unwrap_err();
        assert_matches!(err, CoreError::NotFound { .. });
    }

    #[tokio::test]
    async fn persistence_failure_does_not_revert_success() {
        let client = FakeClient::scripted(vec![snapshot(
            "succeeded",
            Some(vec!["https://img/1.png"]),
            None,
        )]);
        let store = RecordingStore::failing();
        let ctrl = controller(client, store);
        let mut events = ctrl.subscribe();

        ctrl.submit("u1", request("a cat")).await.unwrap();
        let status = wait_for_terminal(&ctrl, "u1").await;
        assert_eq!(status.state, GenerationState::Succeeded);

        wait_for_event(&mut events, |e| {
            matches!(e, GenerationEvent::HistoryPersistFailed { .. })
        })
        .await;

        // The result is still visible after the failed write.
        let status = ctrl.status("u1").await.unwrap();
        assert_eq!(status.state, GenerationState::Succeeded);
        assert_matches!(status.result, Some(GenerationResult::Images(_)));
    }

    #[tokio::test]
    async fn submit_after_terminal_replaces_the_handle() {
        let client = FakeClient::scripted(vec![snapshot(
            "succeeded",
            Some(vec!["https://img/1.png"]),
            None,
        )]);
        let ctrl = controller(Arc::clone(&client), RecordingStore::new());

        ctrl.submit("u1", request("a cat")).await.unwrap();
        wait_for_terminal(&ctrl, "u1").await;

        ctrl.submit("u1", request("a dog")).await.unwrap();
        assert_eq!(client.create_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn billing_rejection_surfaces_and_leaves_no_handle() {
        let client = FakeClient::failing_create(402);
        let ctrl = controller(client, RecordingStore::new());

        let err = ctrl.submit("u1", request("a cat")).await.unwrap_err();
        assert_matches!(err, CoreError::Billing(_));
        assert!(ctrl.status("u1").await.is_none());
    }

    #[tokio::test]
    async fn provider_rejection_surfaces_and_leaves_no_handle() {
        let client = FakeClient::failing_create(500);
        let ctrl = controller(client, RecordingStore::new());

        let err = ctrl.submit("u1", request("a cat")).await.unwrap_err();
        assert_matches!(err, CoreError::Provider(msg) if msg.contains("rejected"));
        assert!(ctrl.status("u1").await.is_none());
    }

    #[tokio::test]
    async fn shutdown_stops_all_polling_tasks() {
        let client = FakeClient::scripted(vec![snapshot("processing", None, None)]);
        let ctrl = controller(Arc::clone(&client), RecordingStore::new());

        ctrl.submit("u1", request("a cat")).await.unwrap();
        ctrl.submit("u2", request("a dog")).await.unwrap();
        ctrl.shutdown().await;

        let polls = client.get_calls.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(client.get_calls.load(Ordering::SeqCst), polls);
        assert!(ctrl.status("u1").await.is_none());
        assert!(ctrl.status("u2").await.is_none());
    }
}

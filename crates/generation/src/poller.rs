//! Status polling loop for one in-flight prediction.
//!
//! Exactly one of these runs per submitted prediction. Each iteration
//! issues a single status query and interprets the snapshot; there is
//! never more than one poll in flight for a handle, so responses are
//! consumed in issuance order. The loop stops the instant a terminal
//! outcome is observed or the cancellation token fires; an in-flight
//! query at cancel time still completes but its result is discarded by
//! the caller.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use rusher_core::generation::{interpret_status, PollOutcome};

use crate::api::PredictionClient;

/// Tunable polling parameters.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between consecutive status queries.
    pub interval: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Poll a prediction until it reaches a terminal outcome.
///
/// Returns `Some(outcome)` for a terminal status, or `None` if the
/// token was cancelled first. A status-query failure is terminal: the
/// caller surfaces it and the user resubmits; nothing retries here.
/// There is no overall deadline — a stuck provider job polls until
/// cancelled.
pub async fn poll_until_terminal(
    client: &dyn PredictionClient,
    prediction_id: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Option<PollOutcome> {
    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => return None,
            result = client.get(prediction_id) => result,
        };

        match result {
            Ok(prediction) => {
                let outcome = interpret_status(
                    &prediction.status,
                    prediction.output.as_deref(),
                    prediction.error.as_deref(),
                );
                if outcome != PollOutcome::Pending {
                    return Some(outcome);
                }
                tracing::debug!(prediction_id, status = %prediction.status, "Prediction still running");
            }
            Err(e) => {
                tracing::warn!(prediction_id, error = %e, "Status query failed");
                return Some(PollOutcome::Failed(e.to_string()));
            }
        }

        tokio::select! {
            _ = cancel.cancelled() => return None,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::api::{Prediction, PredictionApiError};
    use crate::payload::ProviderPayload;

    /// Serves a scripted sequence of status snapshots; the last one
    /// repeats once the script runs out.
    struct ScriptedClient {
        script: Mutex<VecDeque<Prediction>>,
        last: Prediction,
        get_calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn new(script: Vec<Prediction>) -> Self {
            let last = script.last().cloned().expect("script must be non-empty");
            Self {
                script: Mutex::new(script.into()),
                last,
                get_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PredictionClient for ScriptedClient {
        async fn create(
            &self,
            _payload: &ProviderPayload,
        ) -> Result<Prediction, PredictionApiError> {
            unimplemented!("poller tests never create predictions")
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

    fn fast() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn polls_through_pending_to_success() {
        let client = ScriptedClient::new(vec![
            snapshot("starting", None, None),
            snapshot("processing", None, None),
            snapshot("succeeded", Some(vec!["https://img/1.png"]), None),
        ]);
        let cancel = CancellationToken::new();

        let outcome = poll_until_terminal(&client, "p1", &fast(), &cancel).await;
        assert_eq!(
            outcome,
            Some(PollOutcome::Succeeded(vec!["https://img/1.png".to_string()]))
        );
        assert_eq!(client.get_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_on_first_terminal_snapshot() {
        let client = ScriptedClient::new(vec![snapshot("failed", None, Some("NSFW content"))]);
        let cancel = CancellationToken::new();

        let outcome = poll_until_terminal(&client, "p1", &fast(), &cancel).await;
        assert_eq!(outcome, Some(PollOutcome::Failed("NSFW content".to_string())));
        assert_eq!(client.get_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_before_start_polls_nothing() {
        let client = ScriptedClient::new(vec![snapshot("processing", None, None)]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = poll_until_terminal(&client, "p1", &fast(), &cancel).await;
        assert!(outcome.is_none());
        assert_eq!(client.get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn cancellation_between_polls_returns_none() {
        let client = ScriptedClient::new(vec![snapshot("processing", None, None)]);
        let cancel = CancellationToken::new();

        let config = PollConfig {
            interval: Duration::from_secs(60),
        };
        let handle = {
            let cancel = cancel.clone();
            async move {
                // Give the first poll time to complete, then cancel
                // during the sleep.
                tokio::time::sleep(Duration::from_millis(20)).await;
                cancel.cancel();
            }
        };

        let (outcome, ()) =
            tokio::join!(poll_until_terminal(&client, "p1", &config, &cancel), handle);
        assert!(outcome.is_none());
        assert_eq!(client.get_calls.load(Ordering::SeqCst), 1);
    }
}

//! HTTP client for the image-generation provider's prediction API.
//!
//! The service credential is injected here, server-side, and is never
//! part of any value returned to callers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use rusher_core::error::CoreError;

use crate::payload::ProviderPayload;

/// Base URL of the provider's REST API.
pub const PROVIDER_API_URL: &str = "https://api.replicate.com/v1";

/// Message surfaced when the provider rejects a request for billing
/// reasons (HTTP 402).
pub const BILLING_MESSAGE: &str = "Your Replicate account requires payment or has insufficient \
     credits. Please visit https://replicate.com to check your account status.";

/// One prediction as reported by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Provider-assigned identifier.
    pub id: String,
    /// Raw provider status string (`starting`, `processing`,
    /// `succeeded`, `failed`, ...).
    pub status: String,
    /// Output image URLs, present once the prediction succeeds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<Vec<String>>,
    /// Provider error message, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Errors from the prediction API layer.
#[derive(Debug, thiserror::Error)]
pub enum PredictionApiError {
    /// The HTTP request itself failed (network, DNS, TLS, ...).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned 402; the account needs attention.
    #[error("{0}")]
    Billing(String),

    /// The provider returned any other non-2xx status.
    #[error("Provider error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The provider's `error` body field when parseable, the raw
        /// body otherwise.
        message: String,
    },
}

impl From<PredictionApiError> for CoreError {
    fn from(err: PredictionApiError) -> Self {
        match err {
            PredictionApiError::Billing(msg) => CoreError::Billing(msg),
            PredictionApiError::Api { message, .. } => CoreError::Provider(message),
            PredictionApiError::Request(e) => CoreError::Provider(e.to_string()),
        }
    }
}

/// Capability for creating and querying predictions. The lifecycle
/// controller is written against this seam.
#[async_trait]
pub trait PredictionClient: Send + Sync {
    /// Submit a new prediction.
    async fn create(&self, payload: &ProviderPayload) -> Result<Prediction, PredictionApiError>;

    /// Query the current status of a prediction.
    async fn get(&self, id: &str) -> Result<Prediction, PredictionApiError>;
}

/// Reqwest-backed client for the real provider.
#[derive(Debug)]
pub struct ReplicateApi {
    client: reqwest::Client,
    api_url: String,
    token: String,
}

impl ReplicateApi {
    /// Create a client with the given API credential.
    ///
    /// An empty credential is a configuration error, reported before any
    /// network call is made.
    pub fn new(token: String) -> Result<Self, CoreError> {
        if token.trim().is_empty() {
            return Err(CoreError::Configuration(
                "Provider API token is not configured".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_url: PROVIDER_API_URL.to_string(),
            token,
        })
    }

    /// Override the base URL (tests point this at a local server).
    pub fn with_base_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    /// Turn a non-2xx response into the appropriate error. Pulls the
    /// provider's `error` field out of a JSON body when present.
    async fn error_for(response: reqwest::Response) -> PredictionApiError {
        let status = response.status().as_u16();
        if status == 402 {
            return PredictionApiError::Billing(BILLING_MESSAGE.to_string());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
            .unwrap_or(body);

        PredictionApiError::Api { status, message }
    }

    async fn parse_prediction(
        response: reqwest::Response,
    ) -> Result<Prediction, PredictionApiError> {
        if !response.status().is_success() {
            return Err(Self::error_for(response).await);
        }
        Ok(response.json::<Prediction>().await?)
    }
}

#[async_trait]
impl PredictionClient for ReplicateApi {
    async fn create(&self, payload: &ProviderPayload) -> Result<Prediction, PredictionApiError> {
        let response = self
            .client
            .post(format!("{}/predictions", self.api_url))
            .header("Authorization", format!("Token {}", self.token))
            .json(payload)
            .send()
            .await?;

        let prediction = Self::parse_prediction(response).await?;
        tracing::info!(prediction_id = %prediction.id, status = %prediction.status, "Prediction created");
        Ok(prediction)
    }

    async fn get(&self, id: &str) -> Result<Prediction, PredictionApiError> {
        let response = self
            .client
            .get(format!("{}/predictions/{}", self.api_url, id))
            .header("Authorization", format!("Token {}", self.token))
            .send()
            .await?;

        Self::parse_prediction(response).await
    }
}

//! Passthrough handlers for the provider's prediction API.
//!
//! These forward to the provider with the service credential injected
//! server-side; the credential never reaches the client. Provider error
//! bodies and status codes pass through unchanged, except 402 which
//! becomes the billing-specific message.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use rusher_core::error::CoreError;
use rusher_core::generation::GenerationRequest;
use rusher_generation::api::PredictionApiError;
use rusher_generation::payload::ProviderPayload;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/replicate/predictions
///
/// Builds the provider payload (pinned version, explicit defaults) from
/// the request body and submits it.
pub async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let payload = ProviderPayload::from_request(&request);
    let prediction = state
        .provider
        .create(&payload)
        .await
        .map_err(passthrough)?;
    Ok(Json(prediction))
}

/// GET /api/v1/replicate/predictions/{id}
pub async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let prediction = state.provider.get(&id).await.map_err(passthrough)?;
    Ok(Json(prediction))
}

/// Keep the provider's own status code and error body visible to the
/// caller; only 402 is rewritten into the billing message.
fn passthrough(err: PredictionApiError) -> AppError {
    match err {
        PredictionApiError::Billing(msg) => AppError::Core(CoreError::Billing(msg)),
        PredictionApiError::Api { status, message } => AppError::Upstream { status, message },
        PredictionApiError::Request(e) => AppError::Internal(e.to_string()),
    }
}

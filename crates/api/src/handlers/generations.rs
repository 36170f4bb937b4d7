//! Handlers for the generation lifecycle.
//!
//! Routes:
//! - `POST   /generations`          — submit a generation
//! - `GET    /generations/current`  — snapshot of the active handle
//! - `DELETE /generations/current`  — cancel and release the handle

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use rusher_core::error::CoreError;
use rusher_core::generation::GenerationRequest;

use crate::error::{AppError, AppResult};
use crate::extract::UserContext;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

/// POST /api/v1/generations
///
/// Validates and submits; the response carries the provider-assigned
/// prediction id and the `polling` state. Poll progress via
/// `GET /generations/current`.
pub async fn submit_generation(
    State(state): State<AppState>,
    user: UserContext,
    Json(request): Json<GenerationRequest>,
) -> AppResult<impl IntoResponse> {
    let status = state
        .controller
        .submit(&user.user_id, request)
        .await
        .map_err(AppError::Core)?;

    Ok(Json(DataResponse { data: status }))
}

/// GET /api/v1/generations/current
///
/// Reads the handle snapshot; never issues a provider call itself, so
/// querying a terminal handle is a no-op.
pub async fn generation_status(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<impl IntoResponse> {
    let status = state
        .controller
        .status(&user.user_id)
        .await
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Generation",
            id: user.user_id.clone(),
        }))?;

    Ok(Json(DataResponse { data: status }))
}

/// DELETE /api/v1/generations/current
///
/// Stops polling and releases the handle. The provider-side job is not
/// cancelled; its eventual result is discarded.
pub async fn cancel_generation(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<impl IntoResponse> {
    state
        .controller
        .cancel(&user.user_id)
        .await
        .map_err(AppError::Core)?;

    Ok(Json(DataResponse {
        data: CancelResponse { cancelled: true },
    }))
}

//! Handlers for generation history.
//!
//! Routes:
//! - `GET    /history?limit=`  — recent records, newest first
//! - `GET    /history/{id}`    — one record
//! - `DELETE /history/{id}`    — remove record and hosted images

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::extract::UserContext;
use crate::response::DataResponse;
use crate::state::AppState;

/// Cap on the history page size.
pub const MAX_HISTORY_LIMIT: i64 = 50;

fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// GET /api/v1/history
pub async fn list_history(
    State(state): State<AppState>,
    user: UserContext,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.clamp(1, MAX_HISTORY_LIMIT);
    let records = state
        .history_store
        .list(&user.user_id, limit)
        .await
        .map_err(AppError::Core)?;

    Ok(Json(DataResponse { data: records }))
}

/// GET /api/v1/history/{id}
pub async fn get_history(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .history_store
        .get(&user.user_id, &id)
        .await
        .map_err(AppError::Core)?;

    Ok(Json(DataResponse { data: record }))
}

/// DELETE /api/v1/history/{id}
///
/// Removes the record; associated hosted images are deleted
/// best-effort.
pub async fn delete_history(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    state
        .history_store
        .delete(&user.user_id, &id)
        .await
        .map_err(AppError::Core)?;

    Ok(Json(DataResponse {
        data: DeleteResponse { deleted: true },
    }))
}

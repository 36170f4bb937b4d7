//! Handlers exposing the preset selection engine to the UI layer.
//!
//! Routes:
//! - `POST /selection/toggle`         — toggle one preset
//! - `POST /selection/apply-history`  — reconstruct state from a record
//!
//! The engine itself is pure; these handlers only look up the presets
//! and records involved.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use rusher_core::error::CoreError;
use rusher_core::selection::{self, PresetInfo, SelectionState};
use rusher_store::repositories::LoraRepo;

use crate::error::{AppError, AppResult};
use crate::extract::UserContext;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Current selection state as held by the UI.
    #[serde(default)]
    pub state: SelectionState,
    /// Preset to toggle in or out.
    pub preset_id: uuid::Uuid,
}

#[derive(Debug, Deserialize)]
pub struct ApplyHistoryRequest {
    pub record_id: String,
}

/// POST /api/v1/selection/toggle
pub async fn toggle(
    State(state): State<AppState>,
    user: UserContext,
    Json(input): Json<ToggleRequest>,
) -> AppResult<impl IntoResponse> {
    let preset = LoraRepo::find_by_id(&state.pool, &user.user_id, input.preset_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LoraPreset",
            id: input.preset_id.to_string(),
        }))?;

    let next = selection::toggle_preset(input.state, &preset.preset_info());
    Ok(Json(DataResponse { data: next }))
}

/// POST /api/v1/selection/apply-history
///
/// Entries that resolve to no saved preset are dropped (with a logged
/// warning); the reconstructed selection may be partial.
pub async fn apply_history(
    State(state): State<AppState>,
    user: UserContext,
    Json(input): Json<ApplyHistoryRequest>,
) -> AppResult<impl IntoResponse> {
    let record = state
        .history_store
        .get(&user.user_id, &input.record_id)
        .await
        .map_err(AppError::Core)?;

    let presets = LoraRepo::list(&state.pool, &user.user_id).await?;
    let infos: Vec<PresetInfo> = presets.iter().map(|p| p.preset_info()).collect();

    let replay = selection::apply_history(&record.prompt, &record.settings, &infos);
    Ok(Json(DataResponse { data: replay }))
}

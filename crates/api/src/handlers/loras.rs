//! Handlers for saved LoRA presets.
//!
//! Routes:
//! - `GET    /loras`       — list the user's presets
//! - `POST   /loras`       — save a preset
//! - `PUT    /loras/{id}`  — edit a preset
//! - `DELETE /loras/{id}`  — delete a preset

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use rusher_core::error::CoreError;
use rusher_core::lora::validate_lora_preset;
use rusher_store::models::{CreateLoraPreset, UpdateLoraPreset};
use rusher_store::repositories::LoraRepo;

use crate::error::{AppError, AppResult};
use crate::extract::UserContext;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// GET /api/v1/loras
pub async fn list_loras(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<impl IntoResponse> {
    let presets = LoraRepo::list(&state.pool, &user.user_id).await?;
    Ok(Json(DataResponse { data: presets }))
}

/// POST /api/v1/loras
///
/// A duplicate provider path for the same user is a conflict (the path
/// is the replay join key).
pub async fn create_lora(
    State(state): State<AppState>,
    user: UserContext,
    Json(input): Json<CreateLoraPreset>,
) -> AppResult<impl IntoResponse> {
    validate_lora_preset(
        &input.name,
        &input.hf_path,
        &input.trigger_word,
        input.default_scale,
    )
    .map_err(AppError::Core)?;

    let preset = LoraRepo::create(&state.pool, &user.user_id, &input).await?;
    Ok(Json(DataResponse { data: preset }))
}

/// PUT /api/v1/loras/{id}
///
/// Partial update: absent fields keep their stored values. The merged
/// result is validated as a whole before the write.
pub async fn update_lora(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<uuid::Uuid>,
    Json(input): Json<UpdateLoraPreset>,
) -> AppResult<impl IntoResponse> {
    let existing = LoraRepo::find_by_id(&state.pool, &user.user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LoraPreset",
            id: id.to_string(),
        }))?;

    validate_lora_preset(
        input.name.as_deref().unwrap_or(&existing.name),
        input.hf_path.as_deref().unwrap_or(&existing.hf_path),
        input
            .trigger_word
            .as_deref()
            .unwrap_or(&existing.trigger_word),
        input.default_scale.unwrap_or(existing.default_scale),
    )
    .map_err(AppError::Core)?;

    let updated = LoraRepo::update(&state.pool, &user.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "LoraPreset",
            id: id.to_string(),
        }))?;

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/loras/{id}
pub async fn delete_lora(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<uuid::Uuid>,
) -> AppResult<impl IntoResponse> {
    let deleted = LoraRepo::delete(&state.pool, &user.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "LoraPreset",
            id: id.to_string(),
        }));
    }

    Ok(Json(DataResponse {
        data: DeleteResponse { deleted: true },
    }))
}

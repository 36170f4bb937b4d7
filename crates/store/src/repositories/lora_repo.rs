//! Repository for the `lora_presets` table.

use sqlx::PgPool;

use crate::models::lora::{CreateLoraPreset, LoraPreset, UpdateLoraPreset};

const COLUMNS: &str = "id, user_id, name, hf_path, trigger_word, default_scale, \
     thumbnail, created_at, updated_at";

/// CRUD operations for saved LoRA presets, always scoped to a user.
pub struct LoraRepo;

impl LoraRepo {
    /// Insert a new preset, returning the created row.
    pub async fn create(
        pool: &PgPool,
        user_id: &str,
        input: &CreateLoraPreset,
    ) -> Result<LoraPreset, sqlx::Error> {
        let query = format!(
            "INSERT INTO lora_presets \
                (user_id, name, hf_path, trigger_word, default_scale, thumbnail) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoraPreset>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.hf_path)
            .bind(&input.trigger_word)
            .bind(input.default_scale)
            .bind(&input.thumbnail)
            .fetch_one(pool)
            .await
    }

    /// List all of a user's presets, newest first.
    pub async fn list(pool: &PgPool, user_id: &str) -> Result<Vec<LoraPreset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lora_presets \
             WHERE user_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, LoraPreset>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Find one preset by id, scoped to the user.
    pub async fn find_by_id(
        pool: &PgPool,
        user_id: &str,
        id: uuid::Uuid,
    ) -> Result<Option<LoraPreset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lora_presets WHERE user_id = $1 AND id = $2");
        sqlx::query_as::<_, LoraPreset>(&query)
            .bind(user_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a preset. Only non-`None` fields are applied; `updated_at`
    /// is always bumped.
    pub async fn update(
        pool: &PgPool,
        user_id: &str,
        id: uuid::Uuid,
        input: &UpdateLoraPreset,
    ) -> Result<Option<LoraPreset>, sqlx::Error> {
        let query = format!(
            "UPDATE lora_presets SET \
                name = COALESCE($3, name), \
                hf_path = COALESCE($4, hf_path), \
                trigger_word = COALESCE($5, trigger_word), \
                default_scale = COALESCE($6, default_scale), \
                thumbnail = COALESCE($7, thumbnail), \
                updated_at = now() \
             WHERE user_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LoraPreset>(&query)
            .bind(user_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.hf_path)
            .bind(&input.trigger_word)
            .bind(input.default_scale)
            .bind(&input.thumbnail)
            .fetch_optional(pool)
            .await
    }

    /// Delete a preset. Returns `true` if a row was removed.
    pub async fn delete(
        pool: &PgPool,
        user_id: &str,
        id: uuid::Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM lora_presets WHERE user_id = $1 AND id = $2")
            .bind(user_id)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! History record rows and DTOs.

use rusher_core::history::{GenerationSettings, HistoryRecord};
use rusher_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `history_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct HistoryRow {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub prompt: String,
    pub images: Vec<String>,
    pub settings: Json<GenerationSettings>,
    pub created_at: Timestamp,
}

impl From<HistoryRow> for HistoryRecord {
    fn from(row: HistoryRow) -> Self {
        HistoryRecord {
            id: row.id.to_string(),
            prompt: row.prompt,
            images: row.images,
            settings: row.settings.0,
            created_at: row.created_at,
        }
    }
}

/// Insert payload for a new history record. The id and timestamp are
/// assigned by the database.
#[derive(Debug, Clone)]
pub struct NewHistoryRecord {
    pub prompt: String,
    pub images: Vec<String>,
    pub settings: GenerationSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_converts_to_domain_record() {
        let settings: GenerationSettings = serde_json::from_value(serde_json::json!({
            "model": "flux-dev",
            "num_images": 1,
            "width": 512,
            "height": 512,
            "guidance_scale": 3.5,
            "steps": 28,
            "prompt_strength": 0.8,
            "loras": []
        }))
        .unwrap();

        let id = uuid::Uuid::new_v4();
        let row = HistoryRow {
            id,
            user_id: "u1".to_string(),
            prompt: "a cat".to_string(),
            images: vec!["https://img/1.png".to_string()],
            settings: Json(settings),
            created_at: chrono::Utc::now(),
        };

        let record: HistoryRecord = row.into();
        assert_eq!(record.id, id.to_string());
        assert_eq!(record.images.len(), 1);
        assert_eq!(record.settings.steps, 28);
    }
}

//! LoRA preset rows and DTOs.

use rusher_core::selection::PresetInfo;
use rusher_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lora_presets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoraPreset {
    pub id: uuid::Uuid,
    pub user_id: String,
    pub name: String,
    /// Provider path; unique per user and used as the join key when
    /// replaying history entries.
    pub hf_path: String,
    pub trigger_word: String,
    pub default_scale: f64,
    pub thumbnail: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LoraPreset {
    /// Project the slice of this preset the selection engine works with.
    pub fn preset_info(&self) -> PresetInfo {
        PresetInfo {
            id: self.id.to_string(),
            path: self.hf_path.clone(),
            trigger_word: self.trigger_word.clone(),
            default_scale: self.default_scale,
        }
    }
}

/// DTO for creating a new preset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLoraPreset {
    pub name: String,
    pub hf_path: String,
    pub trigger_word: String,
    pub default_scale: f64,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// DTO for updating an existing preset. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateLoraPreset {
    pub name: Option<String>,
    pub hf_path: Option<String>,
    pub trigger_word: Option<String>,
    pub default_scale: Option<f64>,
    pub thumbnail: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_info_projection() {
        let preset = LoraPreset {
            id: uuid::Uuid::new_v4(),
            user_id: "u1".to_string(),
            name: "Style".to_string(),
            hf_path: "owner/style".to_string(),
            trigger_word: "TOK".to_string(),
            default_scale: 0.5,
            thumbnail: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        };

        let info = preset.preset_info();
        assert_eq!(info.id, preset.id.to_string());
        assert_eq!(info.path, "owner/style");
        assert_eq!(info.trigger_word, "TOK");
        assert_eq!(info.default_scale, 0.5);
    }
}

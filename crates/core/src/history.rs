//! Durable record of one completed generation.

use serde::{Deserialize, Serialize};

use crate::generation::LoraRef;
use crate::types::Timestamp;

/// Settings snapshot stored alongside the images that were produced with
/// them. Serialized as JSON in the document; replay reconstructs the UI
/// state from this.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub model: String,
    pub num_images: u32,
    pub width: u32,
    pub height: u32,
    pub guidance_scale: f64,
    pub steps: u32,
    pub prompt_strength: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(default)]
    pub loras: Vec<LoraRef>,
}

/// One completed generation. Immutable after creation except for
/// deletion, which also removes the hosted images best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub prompt: String,
    /// Ordered image URLs; hosted URLs where upload succeeded, the
    /// provider's original URLs otherwise.
    pub images: Vec<String>,
    pub settings: GenerationSettings,
    pub created_at: Timestamp,
}

impl GenerationSettings {
    /// Snapshot the settings of a request, as they will be persisted with
    /// the record.
    pub fn from_request(request: &crate::generation::GenerationRequest) -> Self {
        Self {
            model: request.model.clone(),
            num_images: request.num_images,
            width: request.width,
            height: request.height,
            guidance_scale: request.guidance_scale,
            steps: request.steps,
            prompt_strength: request.prompt_strength,
            seed: request.seed,
            loras: request.loras.clone(),
        }
    }
}

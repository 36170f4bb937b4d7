//! Provider payload construction.
//!
//! A validated [`GenerationRequest`] becomes the wire shape the provider
//! expects: a pinned model version plus an `input` object with explicit
//! defaults (512x512, fixed scheduler, safety checker disabled) and the
//! LoRA list split into parallel path/scale arrays.

use serde::Serialize;

use rusher_core::generation::{GenerationRequest, DEFAULT_SCHEDULER, MODEL_VERSION};

/// Request body for `POST /predictions`.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderPayload {
    pub version: String,
    pub input: ProviderInput,
}

/// The provider's `input` object.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderInput {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    pub width: u32,
    pub height: u32,
    pub num_outputs: u32,
    pub scheduler: String,
    pub num_inference_steps: u32,
    pub guidance_scale: f64,
    pub prompt_strength: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    pub hf_loras: Vec<String>,
    pub lora_scales: Vec<f64>,
    pub disable_safety_checker: bool,
}

impl ProviderPayload {
    /// Build the wire payload for a request.
    pub fn from_request(request: &GenerationRequest) -> Self {
        let hf_loras = request.loras.iter().map(|l| l.path.clone()).collect();
        let lora_scales = request.loras.iter().map(|l| l.scale).collect();

        Self {
            version: MODEL_VERSION.to_string(),
            input: ProviderInput {
                prompt: request.prompt.clone(),
                negative_prompt: request.negative_prompt.clone(),
                width: request.width,
                height: request.height,
                num_outputs: request.num_images,
                scheduler: DEFAULT_SCHEDULER.to_string(),
                num_inference_steps: request.steps,
                guidance_scale: request.guidance_scale,
                prompt_strength: request.prompt_strength,
                seed: request.seed,
                hf_loras,
                lora_scales,
                disable_safety_checker: true,
            },
        }
    }
}

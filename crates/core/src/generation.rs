//! Generation request model, validation, and the lifecycle state machine.
//!
//! A request is validated here before anything touches the network; the
//! provider-facing payload shape lives in the generation crate.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults and limits
// ---------------------------------------------------------------------------

/// Output width, fixed by configuration.
pub const DEFAULT_WIDTH: u32 = 512;
/// Output height, fixed by configuration.
pub const DEFAULT_HEIGHT: u32 = 512;
/// Scheduler passed to the provider, fixed by configuration.
pub const DEFAULT_SCHEDULER: &str = "DPMSolverMultistep";
/// Model identifier shown to users by default.
pub const DEFAULT_MODEL: &str = "flux-dev";
/// Pinned provider model version hash submitted with every prediction.
pub const MODEL_VERSION: &str =
    "2389224e115448d9a77c07d7d45672b3f0aa45acacf1c5bcf51857ac295e3aec";

pub const DEFAULT_NUM_IMAGES: u32 = 1;
pub const DEFAULT_GUIDANCE_SCALE: f64 = 3.5;
pub const DEFAULT_STEPS: u32 = 28;
pub const DEFAULT_PROMPT_STRENGTH: f64 = 0.8;

pub const MAX_NUM_IMAGES: u32 = 4;
pub const MAX_STEPS: u32 = 50;
pub const MAX_GUIDANCE_SCALE: f64 = 10.0;
pub const MAX_PROMPT_STRENGTH: f64 = 10.0;
pub const MAX_LORA_SCALE: f64 = 2.0;

// ---------------------------------------------------------------------------
// Request model
// ---------------------------------------------------------------------------

/// A LoRA applied to one generation: provider path plus scalar strength.
///
/// `preset_id` links back to the saved preset that produced this entry.
/// Older stored records do not carry it, so replay falls back to string
/// matching on `path` (see [`crate::selection`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoraRef {
    pub path: String,
    pub scale: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_id: Option<String>,
}

/// Everything needed to submit one generation. Ephemeral: owned by the
/// lifecycle controller for the duration of a single prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    /// Accepts the provider-style `num_outputs` spelling on the proxy
    /// surface.
    #[serde(default = "default_num_images", alias = "num_outputs")]
    pub num_images: u32,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_guidance_scale")]
    pub guidance_scale: f64,
    #[serde(default = "default_steps", alias = "num_inference_steps")]
    pub steps: u32,
    #[serde(default = "default_prompt_strength")]
    pub prompt_strength: f64,
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub loras: Vec<LoraRef>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_num_images() -> u32 {
    DEFAULT_NUM_IMAGES
}
fn default_width() -> u32 {
    DEFAULT_WIDTH
}
fn default_height() -> u32 {
    DEFAULT_HEIGHT
}
fn default_guidance_scale() -> f64 {
    DEFAULT_GUIDANCE_SCALE
}
fn default_steps() -> u32 {
    DEFAULT_STEPS
}
fn default_prompt_strength() -> f64 {
    DEFAULT_PROMPT_STRENGTH
}

impl GenerationRequest {
    /// Validate the request. Runs before any network call.
    ///
    /// - prompt must be non-empty (whitespace does not count)
    /// - image count 1..=4, steps 1..=50
    /// - guidance scale 0..=10, prompt strength 0..=10
    /// - LoRA scales 0..=2, at most one reference per distinct path
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.prompt.trim().is_empty() {
            return Err(CoreError::Validation(
                "Prompt must not be empty".to_string(),
            ));
        }
        if self.num_images < 1 || self.num_images > MAX_NUM_IMAGES {
            return Err(CoreError::Validation(format!(
                "Image count must be between 1 and {MAX_NUM_IMAGES}, got {}",
                self.num_images
            )));
        }
        if self.steps < 1 || self.steps > MAX_STEPS {
            return Err(CoreError::Validation(format!(
                "Inference steps must be between 1 and {MAX_STEPS}, got {}",
                self.steps
            )));
        }
        if !(0.0..=MAX_GUIDANCE_SCALE).contains(&self.guidance_scale) {
            return Err(CoreError::Validation(format!(
                "Guidance scale must be between 0 and {MAX_GUIDANCE_SCALE}, got {}",
                self.guidance_scale
            )));
        }
        if !(0.0..=MAX_PROMPT_STRENGTH).contains(&self.prompt_strength) {
            return Err(CoreError::Validation(format!(
                "Prompt strength must be between 0 and {MAX_PROMPT_STRENGTH}, got {}",
                self.prompt_strength
            )));
        }

        let mut seen_paths = HashSet::new();
        for lora in &self.loras {
            if !(0.0..=MAX_LORA_SCALE).contains(&lora.scale) {
                return Err(CoreError::Validation(format!(
                    "LoRA scale for '{}' must be between 0 and {MAX_LORA_SCALE}, got {}",
                    lora.path, lora.scale
                )));
            }
            if !seen_paths.insert(lora.path.as_str()) {
                return Err(CoreError::Validation(format!(
                    "Duplicate LoRA path '{}'",
                    lora.path
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lifecycle state machine
// ---------------------------------------------------------------------------

/// State of one generation request, as tracked by the lifecycle
/// controller. Transitions: Idle -> Submitting -> Polling -> terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    Submitting,
    Polling,
    Succeeded,
    Failed,
    Cancelled,
}

impl GenerationState {
    /// Terminal states release the handle; polling stops the instant one
    /// is observed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationState::Succeeded | GenerationState::Failed | GenerationState::Cancelled
        )
    }
}

/// Terminal outcome of one generation. Produced exactly once per handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationResult {
    /// Non-empty ordered list of image URLs.
    Images(Vec<String>),
    /// Human-readable failure message.
    Error(String),
}

/// What one poll response means for the state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Not terminal; poll again after the interval.
    Pending,
    /// Terminal success with the provider's output URLs.
    Succeeded(Vec<String>),
    /// Terminal failure with a displayable message.
    Failed(String),
}

/// Provider status value that signals success.
pub const STATUS_SUCCEEDED: &str = "succeeded";
/// Provider status value that signals failure.
pub const STATUS_FAILED: &str = "failed";

/// Fallback message when the provider reports failure without a reason.
pub const GENERIC_FAILURE: &str = "Generation failed";

/// Interpret a single provider status snapshot.
///
/// - `succeeded` with non-empty output is the only success.
/// - `failed`, or any error message present, is a failure; the provider's
///   message wins, with a generic fallback.
/// - `succeeded` with no output cannot satisfy the non-empty-result
///   contract, so it is treated as a failure rather than polling forever.
/// - Everything else (`starting`, `processing`, ...) is pending.
pub fn interpret_status(
    status: &str,
    output: Option<&[String]>,
    error: Option<&str>,
) -> PollOutcome {
    if status == STATUS_SUCCEEDED {
        return match output {
            Some(urls) if !urls.is_empty() => PollOutcome::Succeeded(urls.to_vec()),
            _ => PollOutcome::Failed("Generation succeeded but returned no images".to_string()),
        };
    }

    let error_msg = error.filter(|e| !e.is_empty());
    if status == STATUS_FAILED || error_msg.is_some() {
        return PollOutcome::Failed(
            error_msg
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        );
    }

    PollOutcome::Pending
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

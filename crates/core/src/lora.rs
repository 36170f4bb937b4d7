//! Validation for user-saved LoRA presets.

use crate::error::CoreError;

/// Maximum length for a preset display name.
pub const MAX_LORA_NAME_LEN: usize = 200;

/// Minimum allowed default scale.
pub const MIN_DEFAULT_SCALE: f64 = 0.0;

/// Maximum allowed default scale. Per-generation scale overrides may go
/// higher; the saved default stays in 0..=1.
pub const MAX_DEFAULT_SCALE: f64 = 1.0;

/// Validate the fields of a preset before it is written.
///
/// Name, provider path, and trigger word must all be non-empty; the
/// default scale must be within 0..=1.
pub fn validate_lora_preset(
    name: &str,
    hf_path: &str,
    trigger_word: &str,
    default_scale: f64,
) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Preset name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_LORA_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Preset name too long: {} chars (max {MAX_LORA_NAME_LEN})",
            name.len()
        )));
    }
    if hf_path.trim().is_empty() {
        return Err(CoreError::Validation(
            "Preset path must not be empty".to_string(),
        ));
    }
    if trigger_word.trim().is_empty() {
        return Err(CoreError::Validation(
            "Trigger word must not be empty".to_string(),
        ));
    }
    if !(MIN_DEFAULT_SCALE..=MAX_DEFAULT_SCALE).contains(&default_scale) {
        return Err(CoreError::Validation(format!(
            "Default scale must be between {MIN_DEFAULT_SCALE} and {MAX_DEFAULT_SCALE}, got {default_scale}"
        )));
    }
    Ok(())
}

//! Preset selection engine.
//!
//! Pure state-merge logic, no I/O: toggling a saved LoRA preset in and
//! out of the current selection, and reconstructing selection state from
//! a stored history record. The history matching is heuristic by
//! contract — stored records reference presets by provider path, not by a
//! stable foreign key — so replay compares normalized strings and drops
//! entries it cannot resolve.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::history::GenerationSettings;

/// Scale applied when a preset carries no usable default of its own.
pub const FALLBACK_LORA_SCALE: f64 = 0.8;

/// Owner segment used to reconstruct a full provider path from a bare
/// LoRA name during history matching.
pub const DEFAULT_LORA_OWNER: &str = "roshmika";

/// The slice of a saved preset the selection engine needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetInfo {
    pub id: String,
    /// Provider path; the join key against stored history entries.
    pub path: String,
    /// Appended to / removed from the prompt on toggle. Empty means the
    /// preset has no trigger word.
    #[serde(default)]
    pub trigger_word: String,
    pub default_scale: f64,
}

/// In-memory UI selection state the engine transforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected: Vec<PresetInfo>,
    pub prompt: String,
    /// Scale per provider path for every selected preset.
    pub scales: HashMap<String, f64>,
}

/// Selection state reconstructed from a history record, plus the numeric
/// settings the record was generated with.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayState {
    pub selection: SelectionState,
    pub num_images: u32,
    pub guidance_scale: f64,
    pub steps: u32,
}

/// Toggle a preset in or out of the selection.
///
/// Deselecting removes the preset, removes the first literal occurrence
/// of its trigger word from the prompt (trimming the result), and drops
/// its scale entry. Selecting appends the preset, appends the trigger
/// word space-separated, and sets the scale entry to the preset default
/// only if no scale is set for that path yet.
pub fn toggle_preset(mut state: SelectionState, preset: &PresetInfo) -> SelectionState {
    let already_selected = state.selected.iter().any(|p| p.id == preset.id);

    if already_selected {
        state.selected.retain(|p| p.id != preset.id);
        if !preset.trigger_word.is_empty() {
            state.prompt = state
                .prompt
                .replacen(&preset.trigger_word, "", 1)
                .trim()
                .to_string();
        }
        state.scales.remove(&preset.path);
    } else {
        if !preset.trigger_word.is_empty() {
            let current = state.prompt.trim();
            state.prompt = if current.is_empty() {
                preset.trigger_word.clone()
            } else {
                format!("{current} {}", preset.trigger_word)
            };
        }
        state
            .scales
            .entry(preset.path.clone())
            .or_insert(effective_default_scale(preset));
        state.selected.push(preset.clone());
    }

    state
}

fn effective_default_scale(preset: &PresetInfo) -> f64 {
    if preset.default_scale > 0.0 {
        preset.default_scale
    } else {
        FALLBACK_LORA_SCALE
    }
}

/// Reconstruct selection state from a stored record.
///
/// Each stored `{path, scale}` entry resolves to a known preset by an
/// exact `preset_id` join when the record carries one, falling back to
/// the legacy string heuristics: the stored path, its last segment, and
/// an owner-prefixed reconstruction are compared case-insensitively
/// against each preset's id and path. Resolved entries keep the stored
/// scale, not the preset default. Unresolvable entries are dropped with a
/// warning; callers must tolerate a partially reconstructed selection.
pub fn apply_history(
    prompt: &str,
    settings: &GenerationSettings,
    known_presets: &[PresetInfo],
) -> ReplayState {
    let mut selection = SelectionState {
        prompt: prompt.to_string(),
        ..SelectionState::default()
    };

    for lora in &settings.loras {
        let resolved = lora
            .preset_id
            .as_deref()
            .and_then(|id| known_presets.iter().find(|p| p.id == id))
            .or_else(|| resolve_by_path(&lora.path, known_presets));

        match resolved {
            Some(preset) => {
                if !selection.selected.iter().any(|p| p.id == preset.id) {
                    selection.selected.push(preset.clone());
                }
                selection.scales.insert(preset.path.clone(), lora.scale);
            }
            None => {
                tracing::warn!(path = %lora.path, "No saved preset matches stored LoRA path");
            }
        }
    }

    ReplayState {
        selection,
        num_images: settings.num_images,
        guidance_scale: settings.guidance_scale,
        steps: settings.steps,
    }
}

/// Legacy heuristic resolution of a stored provider path against the
/// known presets. First match in preset order wins.
fn resolve_by_path<'a>(path: &str, known_presets: &'a [PresetInfo]) -> Option<&'a PresetInfo> {
    let last_segment = path.rsplit('/').next().unwrap_or(path);
    let candidates = [
        path.to_lowercase(),
        last_segment.to_lowercase(),
        format!("{DEFAULT_LORA_OWNER}/{last_segment}").to_lowercase(),
    ];

    known_presets.iter().find(|preset| {
        let id = preset.id.to_lowercase();
        let preset_path = preset.path.to_lowercase();
        candidates.contains(&id) || candidates.contains(&preset_path)
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

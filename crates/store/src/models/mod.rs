pub mod history;
pub mod lora;

pub use history::{HistoryRow, NewHistoryRecord};
pub use lora::{CreateLoraPreset, LoraPreset, UpdateLoraPreset};

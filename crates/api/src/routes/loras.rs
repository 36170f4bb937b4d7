//! Saved LoRA preset routes, nested under `/loras`.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::loras;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(loras::list_loras).post(loras::create_lora))
        .route("/{id}", put(loras::update_lora).delete(loras::delete_lora))
}

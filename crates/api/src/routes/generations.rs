//! Generation lifecycle routes, nested under `/generations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::generations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generations::submit_generation))
        .route(
            "/current",
            get(generations::generation_status).delete(generations::cancel_generation),
        )
}

//! Provider passthrough routes, nested under `/replicate`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::predictions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predictions", post(predictions::create_prediction))
        .route("/predictions/{id}", get(predictions::get_prediction))
}

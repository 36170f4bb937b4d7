//! Preset selection engine routes, nested under `/selection`.

use axum::routing::post;
use axum::Router;

use crate::handlers::selection;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(selection::toggle))
        .route("/apply-history", post(selection::apply_history))
}

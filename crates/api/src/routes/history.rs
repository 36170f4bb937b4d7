//! Generation history routes, nested under `/history`.

use axum::routing::get;
use axum::Router;

use crate::handlers::history;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(history::list_history))
        .route(
            "/{id}",
            get(history::get_history).delete(history::delete_history),
        )
}

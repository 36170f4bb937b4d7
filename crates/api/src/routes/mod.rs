pub mod generations;
pub mod health;
pub mod history;
pub mod loras;
pub mod predictions;
pub mod selection;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /replicate/predictions            create prediction (proxy)
/// /replicate/predictions/{id}       prediction status (proxy)
///
/// /generations                      submit (POST)
/// /generations/current              status (GET), cancel (DELETE)
///
/// /history                          list (GET)
/// /history/{id}                     get, delete
///
/// /loras                            list, create
/// /loras/{id}                       update, delete
///
/// /selection/toggle                 toggle a preset (POST)
/// /selection/apply-history          replay a record (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/replicate", predictions::router())
        .nest("/generations", generations::router())
        .nest("/history", history::router())
        .nest("/loras", loras::router())
        .nest("/selection", selection::router())
}

use std::sync::Arc;

use rusher_generation::api::PredictionClient;
use rusher_generation::controller::GenerationController;
use rusher_store::history_store::HistoryStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rusher_store::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Lifecycle controller for generations.
    pub controller: Arc<GenerationController>,
    /// History persistence (records + hosted images).
    pub history_store: Arc<dyn HistoryStore>,
    /// Provider client for the passthrough prediction endpoints.
    pub provider: Arc<dyn PredictionClient>,
}

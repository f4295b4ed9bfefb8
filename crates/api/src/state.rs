use std::sync::Arc;

use crate::config::ServerConfig;
use crate::leaderboard_cache::LeaderboardCache;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: studyhub_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Ranked leaderboards, invalidated on every ledger write.
    pub leaderboard_cache: Arc<LeaderboardCache>,
}

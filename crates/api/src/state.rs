use std::sync::Arc;

use gacha_engine::GachaEngine;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GachaEngine>,
    /// Present when the stores are backed by Postgres; used by the health check.
    pub pool: Option<gacha_db::DbPool>,
}

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness of the concert admin backend for load balancers and the
/// grid frontend's connection indicator.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the performance and rundown tables cannot
    /// be reached.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Pings PostgreSQL. The service stays up when the database is down, since
/// grids can still render their last fetched state.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = concert_db::health_check(&state.pool).await.is_ok();

    let status = if db_healthy { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Health route, mounted beside `/api/v1` rather than inside it.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

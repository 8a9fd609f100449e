//! Liveness endpoint, mounted at the root rather than under `/api`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use skycast_core::types::Timestamp;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `"OK"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub timestamp: Timestamp,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// GET /health
///
/// Always 200; an unreachable database only flips `status`.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match skycast_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            false
        }
    };

    Json(HealthResponse {
        status: if db_healthy { "OK" } else { "degraded" },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

//! Health check endpoint.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::delivery::ScopeStats;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub handlers: usize,
    pub queued_messages: usize,
    pub write_scopes: ScopeStats,
}

/// GET /health - Liveness and basic counters
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let write_scopes = state.write_scopes.stats();
    let status = if write_scopes.open() == 0 {
        "healthy"
    } else {
        "busy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        handlers: state.generator.registry().len(),
        queued_messages: state.mail_queue.len().await,
        write_scopes,
    })
}

//! Health check endpoint for container orchestration.
//!
//! Liveness probe used by the Kubernetes deployment: returns 200 with the
//! process uptime whenever the service can answer HTTP at all.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Seconds since the service started
    pub uptime: f64,
}

/// Health check handler.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        uptime: state.uptime_secs(),
    })
}

//! Application status endpoint.

use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    /// RFC 3339 UTC timestamp with millisecond precision
    pub timestamp: String,
}

#[instrument(name = "status::index", skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        message: state.config.service.message.clone(),
        status: "running".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

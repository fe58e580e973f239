//! Health check handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use serde::Serialize;

use super::super::state::AppState;
use super::super::types::{ApiResult, reply};

/// Health check response data
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Server timestamp in milliseconds
    pub timestamp_ms: i64,
    pub uptime_secs: u64,
    pub build: &'static str,
    /// Accounts with a live lock entry right now
    pub locked_accounts: usize,
}

/// GET /v1/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> ApiResult<HealthResponse> {
    reply(
        StatusCode::OK,
        HealthResponse {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            uptime_secs: state.uptime_secs(),
            build: env!("LEDGER_BUILD_REV"),
            locked_accounts: state.service.engine().locks().len(),
        },
    )
}

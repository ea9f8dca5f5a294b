//! `/health` endpoint.

use std::time::Instant;

use serde::Serialize;

/// Health check response body.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server is running.
    pub status: String,
    /// Seconds since the server started.
    pub uptime_secs: u64,
    /// Rows in the loaded dataset.
    pub dataset_rows: usize,
    /// Whisper model identifier in use.
    pub model: String,
}

/// Build a health response from live state.
pub fn health_check(start_time: Instant, dataset_rows: usize, model: &str) -> HealthResponse {
    HealthResponse {
        status: "ok".into(),
        uptime_secs: start_time.elapsed().as_secs(),
        dataset_rows,
        model: model.to_string(),
    }
}

//! API error type and its deterministic HTTP mapping.
//!
//! Client input errors become 400s with a structured body; everything the
//! backend can throw (model inference, spool I/O) becomes a 500 with the
//! same `{"error": ...}` shape, so no failure reaches the client as an
//! opaque framework response.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use tabscribe_dataset::DatasetError;
use tabscribe_transcription::TranscriptionError;

/// Everything a request handler can fail with.
#[derive(Debug, Error)]
pub enum ApiError {
    /// `/get-data` named a column that does not exist.
    #[error("Column '{column}' not found. Available: [{}]", .available.join(", "))]
    ColumnNotFound {
        /// The normalized column the client asked for.
        column: String,
        /// Queryable columns, in table order.
        available: Vec<String>,
    },

    /// `/transcribe_audio` was called without an `audio` form field.
    #[error("No audio file provided")]
    MissingAudio,

    /// The multipart payload could not be parsed (or exceeded limits).
    #[error("invalid multipart payload: {0}")]
    InvalidUpload(String),

    /// The transcription backend failed.
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Spool file handling failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ColumnNotFound { .. } | Self::MissingAudio | Self::InvalidUpload(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Transcription(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DatasetError> for ApiError {
    fn from(err: DatasetError) -> Self {
        match err {
            DatasetError::ColumnNotFound { column, available } => {
                Self::ColumnNotFound { column, available }
            }
            // Load-time errors cannot normally surface here; the table is
            // validated before the server starts.
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::warn!(error = %self, "rejected request");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

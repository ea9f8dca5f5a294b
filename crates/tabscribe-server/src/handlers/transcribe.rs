//! `POST /transcribe_audio` — multipart audio upload → transcript.

use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;

/// Response body: the transcript text.
#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    /// Text produced by the speech-recognition model (possibly empty).
    pub transcript: String,
}

/// Transcribe the uploaded `audio` form field.
///
/// The upload is spooled to a uniquely named temporary file that lives only
/// for this request — the spool handle deletes it on every exit path, so
/// concurrent requests can never read each other's audio.
pub async fn transcribe_audio(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<TranscribeResponse>, ApiError> {
    let mut upload: Option<(Vec<u8>, String)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.to_string()))?
    {
        if field.name() == Some("audio") {
            let mime_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
            upload = Some((data.to_vec(), mime_type));
            break;
        }
    }
    let (data, mime_type) = upload.ok_or(ApiError::MissingAudio)?;
    info!(bytes = data.len(), mime = %mime_type, "transcription requested");

    let spool = tempfile::Builder::new()
        .prefix("tabscribe-audio-")
        .tempfile_in(&state.spool_dir)?;
    tokio::fs::write(spool.path(), &data).await?;

    let result = state
        .transcriber
        .transcribe_file(spool.path(), &mime_type)
        .await?;
    info!(
        "transcribed {:.2}s of audio into {} chars",
        result.duration_seconds,
        result.text.len()
    );

    Ok(Json(TranscribeResponse {
        transcript: result.text,
    }))
}

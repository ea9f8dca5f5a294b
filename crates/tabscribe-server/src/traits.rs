//! The transcription seam.
//!
//! Handlers only see `Arc<dyn Transcriber>`, so router tests can swap in a
//! stub instead of loading real model weights.

use std::path::Path;

use async_trait::async_trait;
use tabscribe_transcription::{TranscriptionEngine, TranscriptionError, TranscriptionResult};

/// Anything that can turn a spooled audio file into a transcript.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `path`. `mime_type` is the uploaded
    /// part's content type, used as a container hint.
    async fn transcribe_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}

#[async_trait]
impl Transcriber for TranscriptionEngine {
    async fn transcribe_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        TranscriptionEngine::transcribe_file(self, path, mime_type).await
    }
}

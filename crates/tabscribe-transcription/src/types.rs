//! Transcription result and error types.

/// Output of one transcription run.
#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    /// The transcript text (possibly empty for silent audio).
    pub text: String,
    /// Language tag the model was asked to use (`"auto"` for detection).
    pub language: String,
    /// Duration of the decoded audio in seconds.
    pub duration_seconds: f64,
}

/// Errors raised anywhere in the transcription pipeline.
#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    /// Model checkpoint missing, or its download failed.
    #[error("model not available: {0}")]
    ModelUnavailable(String),

    /// whisper.cpp failed to load the checkpoint or run a decode.
    #[error("whisper inference failed: {0}")]
    Inference(String),

    /// The uploaded bytes could not be decoded as audio.
    #[error("could not decode audio: {0}")]
    Decode(String),

    /// Resampling to the model's 16kHz input rate failed.
    #[error("could not resample audio: {0}")]
    Resample(String),

    /// File read/write failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Wraps foreign errors into [`TranscriptionError`] variants with a context
/// prefix, replacing repeated `.map_err(|e| ...)` closures at call sites.
pub trait ResultExt<T> {
    /// Wrap as [`TranscriptionError::Inference`].
    fn inference(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap as [`TranscriptionError::Decode`].
    fn decode(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap as [`TranscriptionError::Resample`].
    fn resample(self, context: &str) -> Result<T, TranscriptionError>;
    /// Wrap as [`TranscriptionError::ModelUnavailable`].
    fn model(self, context: &str) -> Result<T, TranscriptionError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn inference(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::Inference(format!("{context}: {e}")))
    }
    fn decode(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::Decode(format!("{context}: {e}")))
    }
    fn resample(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::Resample(format!("{context}: {e}")))
    }
    fn model(self, context: &str) -> Result<T, TranscriptionError> {
        self.map_err(|e| TranscriptionError::ModelUnavailable(format!("{context}: {e}")))
    }
}

//! Whisper context management and the transcription entry points.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::audio;
use crate::types::{ResultExt, TranscriptionError, TranscriptionResult};

/// Engine tuning knobs, filled from settings at startup.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Language hint passed to whisper (`"auto"` enables detection).
    pub language: String,
    /// Threads used by a single decode.
    pub threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            language: "auto".into(),
            threads: 4,
        }
    }
}

/// The speech-recognition engine.
///
/// Holds one `WhisperContext` loaded at startup; every transcription creates
/// a fresh decoding state, so concurrent requests are safe and merely share
/// CPU. Decode and inference both run on `spawn_blocking` threads — neither
/// is async-friendly work.
///
/// Cloning is cheap (shared inner state).
#[derive(Clone)]
pub struct TranscriptionEngine {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    ctx: WhisperContext,
    language: String,
    threads: i32,
}

impl TranscriptionEngine {
    /// Load the GGML checkpoint at `model_path`.
    ///
    /// CPU- and memory-intensive (the base model is ~150 MB); call once at
    /// startup. Fails if the checkpoint is missing or unreadable.
    pub async fn load(
        model_path: PathBuf,
        config: EngineConfig,
    ) -> Result<Self, TranscriptionError> {
        tokio::task::spawn_blocking(move || Self::load_blocking(&model_path, config))
            .await
            .inference("load task join")?
    }

    fn load_blocking(path: &Path, config: EngineConfig) -> Result<Self, TranscriptionError> {
        if !path.exists() {
            return Err(TranscriptionError::ModelUnavailable(format!(
                "checkpoint not found at {}",
                path.display()
            )));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| TranscriptionError::ModelUnavailable("non-UTF-8 model path".into()))?;

        info!(path = %path.display(), "loading whisper checkpoint...");
        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .inference("load checkpoint")?;
        info!(
            language = %config.language,
            threads = config.threads,
            "transcription engine ready"
        );

        Ok(Self {
            inner: Arc::new(EngineInner {
                ctx,
                language: config.language,
                threads: config.threads as i32,
            }),
        })
    }

    /// Transcribe raw audio bytes.
    pub async fn transcribe(
        &self,
        data: Vec<u8>,
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let inner = Arc::clone(&self.inner);
        let mime = mime_type.to_string();

        tokio::task::spawn_blocking(move || {
            let samples = audio::decode_to_model_rate(data, &mime)?;
            let duration_seconds = samples.len() as f64 / f64::from(audio::MODEL_SAMPLE_RATE);
            debug!(
                "decoded {:.2}s of audio ({} samples)",
                duration_seconds,
                samples.len()
            );

            let text = inner.run(&samples)?;
            Ok(TranscriptionResult {
                text,
                language: inner.language.clone(),
                duration_seconds,
            })
        })
        .await
        .inference("transcribe task join")?
    }

    /// Transcribe an audio file on disk (the per-request spool file).
    pub async fn transcribe_file(
        &self,
        path: &Path,
        mime_type: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let data = tokio::fs::read(path).await?;
        debug!(bytes = data.len(), path = %path.display(), "read spooled audio");
        self.transcribe(data, mime_type).await
    }
}

impl EngineInner {
    /// Run one greedy full decode over prepared samples (blocking).
    fn run(&self, samples: &[f32]) -> Result<String, TranscriptionError> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(self.language.as_str()));
        params.set_n_threads(self.threads);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let mut state = self.ctx.create_state().inference("create state")?;
        let _ = state.full(params, samples).inference("full decode")?;

        let segments = state.full_n_segments().inference("segment count")?;
        let mut text = String::new();
        for i in 0..segments {
            text.push_str(&state.full_get_segment_text(i).inference("segment text")?);
        }
        Ok(text.trim().to_string())
    }
}

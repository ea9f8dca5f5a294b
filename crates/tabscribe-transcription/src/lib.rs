//! # tabscribe-transcription
//!
//! Speech-to-text for the `/transcribe_audio` endpoint, built on
//! whisper.cpp via `whisper-rs`.
//!
//! # Pipeline
//!
//! ```text
//! audio bytes → symphonia decode → mono mixdown → rubato resample to 16kHz f32
//! → whisper full decode (greedy) → segment texts → transcript string
//! ```
//!
//! Model checkpoints are GGML files from the `ggerganov/whisper.cpp`
//! Hugging Face repo, downloaded on first use and cached under
//! `~/.tabscribe/models/`.
//!
//! ## Crate position
//!
//! Standalone (no tabscribe crate dependencies).
//! Depended on by: tabscribe-server, tabscribe.

#![deny(unsafe_code)]

pub mod audio;
pub mod engine;
pub mod model;
pub mod types;

pub use engine::{EngineConfig, TranscriptionEngine};
pub use types::{ResultExt, TranscriptionError, TranscriptionResult};

//! # tabscribe-server
//!
//! The HTTP surface of tabscribe: an axum router exposing
//!
//! - `GET /get-data` — exact-match filtering over the in-memory table
//! - `POST /transcribe_audio` — multipart audio upload → transcript
//! - `GET /health` — liveness plus dataset/model identity
//!
//! The dataset table and the transcription engine are injected at
//! construction (no ambient globals). Input-validation failures map to 400
//! with a structured `{"error": ...}` body; backend failures map to 500 the
//! same way. Cross-origin requests are allowed from any origin.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod health;
pub mod server;
pub mod shutdown;
pub mod traits;

pub use config::ServerConfig;
pub use error::ApiError;
pub use server::{ApiServer, AppState};
pub use traits::Transcriber;

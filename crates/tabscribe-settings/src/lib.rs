//! # tabscribe-settings
//!
//! Layered configuration for the tabscribe server.
//!
//! Settings are resolved from three layers (later wins):
//! 1. **Compiled defaults** — [`TabscribeSettings::default()`]
//! 2. **User file** — `~/.tabscribe/settings.json`, deep-merged over defaults
//! 3. **Environment variables** — `TABSCRIBE_*` overrides
//!
//! CLI flags (handled in the binary) sit above all three. The loaded value
//! is passed around explicitly — there is no process-global settings state.
//!
//! ## Crate position
//!
//! Standalone (no tabscribe crate dependencies).
//! Depended on by: tabscribe.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{deep_merge, load_settings, load_settings_from_path, settings_path};
pub use types::{
    DatasetSettings, LoggingSettings, ServerSettings, TabscribeSettings, TranscriptionSettings,
};

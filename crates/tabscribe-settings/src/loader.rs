//! Settings loading: defaults → user file (deep-merged) → env overrides.
//!
//! Deep merge rules:
//! - Objects merge recursively (file values win per-key)
//! - Arrays and primitives are replaced wholesale
//! - Nulls in the file are skipped (the default survives)
//!
//! Environment overrides parse strictly; an out-of-range or malformed value
//! is logged and ignored rather than aborting startup.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::errors::Result;
use crate::types::TabscribeSettings;

/// Resolve the settings file path (`~/.tabscribe/settings.json`).
pub fn settings_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".tabscribe").join("settings.json")
}

/// Load settings from the default path, applying env overrides.
pub fn load_settings() -> Result<TabscribeSettings> {
    load_settings_from_path(&settings_path())
}

/// Load settings from `path`, applying env overrides.
///
/// A missing file yields defaults; a present-but-invalid file is an error
/// (silently ignoring a broken config hides real misconfiguration).
pub fn load_settings_from_path(path: &Path) -> Result<TabscribeSettings> {
    let defaults = serde_json::to_value(TabscribeSettings::default())?;

    let merged = if path.exists() {
        debug!(?path, "loading settings file");
        let content = std::fs::read_to_string(path)?;
        let user: Value = serde_json::from_str(&content)?;
        deep_merge(defaults, user)
    } else {
        debug!(?path, "no settings file, using defaults");
        defaults
    };

    let mut settings: TabscribeSettings = serde_json::from_value(merged)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Recursive deep merge of two JSON values (`source` wins).
pub fn deep_merge(target: Value, source: Value) -> Value {
    match (target, source) {
        (Value::Object(mut target_map), Value::Object(source_map)) => {
            for (key, source_val) in source_map {
                if source_val.is_null() {
                    continue;
                }
                let merged = match target_map.remove(&key) {
                    Some(target_val) => deep_merge(target_val, source_val),
                    None => source_val,
                };
                let _ = target_map.insert(key, merged);
            }
            Value::Object(target_map)
        }
        (_, source) => source,
    }
}

/// Apply `TABSCRIBE_*` environment overrides.
fn apply_env_overrides(settings: &mut TabscribeSettings) {
    if let Some(v) = read_env_string("TABSCRIBE_HOST") {
        settings.server.host = v;
    }
    if let Some(v) = read_env_u16("TABSCRIBE_PORT", 1, 65535) {
        settings.server.port = v;
    }
    if let Some(v) = read_env_u64("TABSCRIBE_MAX_UPLOAD_BYTES", 1024, 1_073_741_824) {
        settings.server.max_upload_bytes = v;
    }
    if let Some(v) = read_env_string("TABSCRIBE_SPOOL_DIR") {
        settings.server.spool_dir = Some(v);
    }

    if let Some(v) = read_env_string("TABSCRIBE_DATASET") {
        settings.dataset.path = v;
    }
    if let Some(v) = read_env_string("TABSCRIBE_SHEET") {
        settings.dataset.sheet = Some(v);
    }

    if let Some(v) = read_env_string("TABSCRIBE_MODEL") {
        settings.transcription.model = v;
    }
    if let Some(v) = read_env_string("TABSCRIBE_MODEL_DIR") {
        settings.transcription.model_dir = Some(v);
    }
    if let Some(v) = read_env_string("TABSCRIBE_LANGUAGE") {
        settings.transcription.language = v;
    }
    if let Some(v) = read_env_usize("TABSCRIBE_THREADS", 1, 256) {
        settings.transcription.threads = v;
    }

    if let Some(v) = read_env_string("TABSCRIBE_LOG_LEVEL") {
        settings.logging.level = v;
    }
}

// ── Pure parsers (testable without touching the environment) ────────────────

/// Parse a `u16` within `[min, max]`.
pub fn parse_u16_range(val: &str, min: u16, max: u16) -> Option<u16> {
    let n: u16 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a `u64` within `[min, max]`.
pub fn parse_u64_range(val: &str, min: u64, max: u64) -> Option<u64> {
    let n: u64 = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

/// Parse a `usize` within `[min, max]`.
pub fn parse_usize_range(val: &str, min: usize, max: usize) -> Option<usize> {
    let n: usize = val.parse().ok()?;
    (n >= min && n <= max).then_some(n)
}

// ── Env readers ─────────────────────────────────────────────────────────────

fn read_env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn read_env_u16(name: &str, min: u16, max: u16) -> Option<u16> {
    let val = std::env::var(name).ok()?;
    let parsed = parse_u16_range(&val, min, max);
    if parsed.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u16 env var, ignoring");
    }
    parsed
}

fn read_env_u64(name: &str, min: u64, max: u64) -> Option<u64> {
    let val = std::env::var(name).ok()?;
    let parsed = parse_u64_range(&val, min, max);
    if parsed.is_none() {
        tracing::warn!(key = name, value = %val, "invalid u64 env var, ignoring");
    }
    parsed
}

fn read_env_usize(name: &str, min: usize, max: usize) -> Option<usize> {
    let val = std::env::var(name).ok()?;
    let parsed = parse_usize_range(&val, min, max);
    if parsed.is_none() {
        tracing::warn!(key = name, value = %val, "invalid usize env var, ignoring");
    }
    parsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SettingsError;

    // ── deep_merge ──

    #[test]
    fn merge_overrides_and_keeps() {
        let merged = deep_merge(
            serde_json::json!({"a": 1, "b": 2}),
            serde_json::json!({"a": 10}),
        );
        assert_eq!(merged["a"], 10);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_recurses_into_objects() {
        let merged = deep_merge(
            serde_json::json!({"server": {"port": 8080, "host": "localhost"}}),
            serde_json::json!({"server": {"port": 9090}}),
        );
        assert_eq!(merged["server"]["port"], 9090);
        assert_eq!(merged["server"]["host"], "localhost");
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let merged = deep_merge(
            serde_json::json!({"items": [1, 2, 3]}),
            serde_json::json!({"items": [9]}),
        );
        assert_eq!(merged["items"], serde_json::json!([9]));
    }

    #[test]
    fn merge_null_preserves_default() {
        let merged = deep_merge(
            serde_json::json!({"a": 1}),
            serde_json::json!({"a": null}),
        );
        assert_eq!(merged["a"], 1);
    }

    #[test]
    fn merge_adds_unknown_keys() {
        let merged = deep_merge(serde_json::json!({"a": 1}), serde_json::json!({"b": 2}));
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["b"], 2);
    }

    #[test]
    fn merge_type_mismatch_takes_source() {
        let merged = deep_merge(
            serde_json::json!({"a": {"nested": true}}),
            serde_json::json!({"a": 42}),
        );
        assert_eq!(merged["a"], 42);
    }

    // ── load_settings_from_path ──

    #[test]
    fn missing_file_yields_defaults() {
        let settings =
            load_settings_from_path(Path::new("/nonexistent/tabscribe-settings.json")).unwrap();
        assert_eq!(settings.server.port, TabscribeSettings::default().server.port);
    }

    #[test]
    fn empty_object_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();
        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.dataset.path, "Model_Data.xlsx");
    }

    #[test]
    fn partial_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"server": {"port": 3000}, "transcription": {"model": "small"}}"#,
        )
        .unwrap();

        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.transcription.model, "small");
        // untouched values keep their defaults
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.transcription.language, "auto");
    }

    #[test]
    fn nested_camel_case_keys_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"server": {"maxUploadBytes": 1048576}}"#).unwrap();
        let settings = load_settings_from_path(&path).unwrap();
        assert_eq!(settings.server.max_upload_bytes, 1_048_576);
    }

    #[test]
    fn invalid_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json at all").unwrap();
        let result = load_settings_from_path(&path);
        assert!(matches!(result, Err(SettingsError::Json(_))));
    }

    #[test]
    fn default_path_is_under_home() {
        let path = settings_path();
        assert!(path.to_string_lossy().contains(".tabscribe"));
        assert!(path.to_string_lossy().ends_with("settings.json"));
    }

    // ── parsers ──

    #[test]
    fn u16_parser_bounds() {
        assert_eq!(parse_u16_range("8080", 1, 65535), Some(8080));
        assert_eq!(parse_u16_range("0", 1, 65535), None);
        assert_eq!(parse_u16_range("port", 1, 65535), None);
        assert_eq!(parse_u16_range("", 1, 65535), None);
    }

    #[test]
    fn u64_parser_bounds() {
        assert_eq!(parse_u64_range("2048", 1024, 1_073_741_824), Some(2048));
        assert_eq!(parse_u64_range("512", 1024, 1_073_741_824), None);
        assert_eq!(parse_u64_range("9999999999999", 1024, 1_073_741_824), None);
    }

    #[test]
    fn usize_parser_bounds() {
        assert_eq!(parse_usize_range("8", 1, 256), Some(8));
        assert_eq!(parse_usize_range("0", 1, 256), None);
        assert_eq!(parse_usize_range("300", 1, 256), None);
    }
}

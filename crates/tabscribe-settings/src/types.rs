//! Settings structs, camelCase on the wire, with compiled defaults.

use serde::{Deserialize, Serialize};

/// Root settings document.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TabscribeSettings {
    /// Settings schema version.
    pub version: String,
    /// Network and request-handling settings.
    pub server: ServerSettings,
    /// Tabular dataset source.
    pub dataset: DatasetSettings,
    /// Speech-recognition settings.
    pub transcription: TranscriptionSettings,
    /// Logging settings.
    pub logging: LoggingSettings,
}

impl Default for TabscribeSettings {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            server: ServerSettings::default(),
            dataset: DatasetSettings::default(),
            transcription: TranscriptionSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

/// Network and request-handling settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerSettings {
    /// Bind address.
    pub host: String,
    /// HTTP port (`0` for auto-assign).
    pub port: u16,
    /// Maximum accepted upload body size in bytes.
    pub max_upload_bytes: u64,
    /// Directory for per-request audio spool files (system temp dir when
    /// unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spool_dir: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: 50 * 1024 * 1024,
            spool_dir: None,
        }
    }
}

/// Tabular dataset source settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatasetSettings {
    /// Spreadsheet file to load at startup.
    pub path: String,
    /// Worksheet name; first sheet when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: "Model_Data.xlsx".to_string(),
            sheet: None,
        }
    }
}

/// Speech-recognition settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranscriptionSettings {
    /// Whisper model size (`tiny`, `base`, `small`, ...).
    pub model: String,
    /// Checkpoint cache directory (`~/.tabscribe/models` when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_dir: Option<String>,
    /// Language hint (`auto` enables detection).
    pub language: String,
    /// Threads per decode.
    pub threads: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            model: "base".to_string(),
            model_dir: None,
            language: "auto".to_string(),
            threads: 4,
        }
    }
}

/// Logging settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoggingSettings {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

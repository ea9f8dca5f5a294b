//! Server configuration.

use std::path::PathBuf;

/// Runtime configuration for [`crate::ApiServer`].
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host to bind (default `"127.0.0.1"`).
    pub host: String,
    /// Port to bind (default `0` for auto-assign).
    pub port: u16,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Directory where per-request audio spool files are created.
    pub spool_dir: PathBuf,
    /// Model identifier reported by `/health`.
    pub model: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            max_upload_bytes: 50 * 1024 * 1024,
            spool_dir: std::env::temp_dir(),
            model: "base".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_loopback_auto_port() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 0);
    }

    #[test]
    fn default_upload_cap_is_50mb() {
        assert_eq!(ServerConfig::default().max_upload_bytes, 52_428_800);
    }

    #[test]
    fn default_spool_dir_is_system_temp() {
        assert_eq!(ServerConfig::default().spool_dir, std::env::temp_dir());
    }

    #[test]
    fn custom_values_stick() {
        let cfg = ServerConfig {
            host: "0.0.0.0".into(),
            port: 9000,
            max_upload_bytes: 1024,
            spool_dir: PathBuf::from("/var/spool/tabscribe"),
            model: "small".into(),
        };
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.model, "small");
    }
}

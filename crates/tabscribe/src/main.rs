//! # tabscribe
//!
//! Server binary — loads the dataset and the whisper checkpoint, then serves
//! `/get-data` and `/transcribe_audio` until interrupted.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tabscribe_server::{ApiServer, ServerConfig};
use tabscribe_settings::TabscribeSettings;
use tabscribe_transcription::{EngineConfig, TranscriptionEngine, model};

/// Tabular query + audio transcription server.
#[derive(Parser, Debug)]
#[command(name = "tabscribe", about = "Tabular query + audio transcription server")]
struct Cli {
    /// Host to bind.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (0 for auto-assign).
    #[arg(long)]
    port: Option<u16>,

    /// Spreadsheet file to serve.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Worksheet name (first sheet when omitted).
    #[arg(long)]
    sheet: Option<String>,

    /// Whisper model size (tiny, base, small, ...).
    #[arg(long)]
    model: Option<String>,

    /// Checkpoint cache directory.
    #[arg(long)]
    model_dir: Option<PathBuf>,

    /// Settings file (defaults to ~/.tabscribe/settings.json).
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// CLI flags win over the settings file and env overrides.
fn apply_cli_overrides(args: &Cli, settings: &mut TabscribeSettings) {
    if let Some(host) = &args.host {
        settings.server.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(dataset) = &args.dataset {
        settings.dataset.path = dataset.to_string_lossy().into_owned();
    }
    if let Some(sheet) = &args.sheet {
        settings.dataset.sheet = Some(sheet.clone());
    }
    if let Some(model) = &args.model {
        settings.transcription.model = model.clone();
    }
    if let Some(dir) = &args.model_dir {
        settings.transcription.model_dir = Some(dir.to_string_lossy().into_owned());
    }
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let settings_path = args
        .settings
        .clone()
        .unwrap_or_else(tabscribe_settings::settings_path);
    let mut settings = tabscribe_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    apply_cli_overrides(&args, &mut settings);

    init_tracing(&settings.logging.level);

    // Dataset — a broken or missing spreadsheet prevents startup.
    let dataset_path = PathBuf::from(&settings.dataset.path);
    let table = tabscribe_dataset::load_table(&dataset_path, settings.dataset.sheet.as_deref())
        .with_context(|| format!("Failed to load dataset from {}", dataset_path.display()))?;

    // Whisper checkpoint — downloaded on first run, then the engine loads it.
    // A model that cannot be fetched or loaded also prevents startup.
    let model_dir = settings
        .transcription
        .model_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(model::default_model_dir);
    let checkpoint = model::ensure_model(&model_dir, &settings.transcription.model)
        .await
        .context("Failed to fetch whisper checkpoint")?;
    let engine = TranscriptionEngine::load(
        checkpoint,
        EngineConfig {
            language: settings.transcription.language.clone(),
            threads: settings.transcription.threads,
        },
    )
    .await
    .context("Failed to load transcription engine")?;

    let config = ServerConfig {
        host: settings.server.host.clone(),
        port: settings.server.port,
        max_upload_bytes: settings.server.max_upload_bytes as usize,
        spool_dir: settings
            .server
            .spool_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir),
        model: settings.transcription.model.clone(),
    };
    std::fs::create_dir_all(&config.spool_dir)
        .with_context(|| format!("Failed to create spool dir {}", config.spool_dir.display()))?;

    let server = ApiServer::new(config, Arc::new(table), Arc::new(engine));
    let (addr, handle) = server.listen().await.context("Failed to bind server")?;
    tracing::info!("tabscribe listening on http://{addr}");

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for ctrl-c")?;
    tracing::info!("shutting down...");
    server.shutdown().drain(handle, None).await;
    tracing::info!("shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_settings_layer() {
        let cli = Cli::parse_from(["tabscribe"]);
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.dataset.is_none());
        assert!(cli.model.is_none());
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from([
            "tabscribe",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--dataset",
            "/data/sales.xlsx",
            "--sheet",
            "Q3",
            "--model",
            "small",
        ]);
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.dataset, Some(PathBuf::from("/data/sales.xlsx")));
        assert_eq!(cli.sheet.as_deref(), Some("Q3"));
        assert_eq!(cli.model.as_deref(), Some("small"));
    }

    #[test]
    fn cli_overrides_win_over_settings() {
        let cli = Cli::parse_from([
            "tabscribe",
            "--port",
            "4321",
            "--dataset",
            "override.xlsx",
            "--model-dir",
            "/opt/models",
        ]);
        let mut settings = TabscribeSettings::default();
        apply_cli_overrides(&cli, &mut settings);
        assert_eq!(settings.server.port, 4321);
        assert_eq!(settings.dataset.path, "override.xlsx");
        assert_eq!(settings.transcription.model_dir.as_deref(), Some("/opt/models"));
        // untouched values survive
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.transcription.model, "base");
    }

    #[test]
    fn absent_flags_leave_settings_alone() {
        let cli = Cli::parse_from(["tabscribe"]);
        let mut settings = TabscribeSettings::default();
        apply_cli_overrides(&cli, &mut settings);
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.dataset.path, "Model_Data.xlsx");
    }
}

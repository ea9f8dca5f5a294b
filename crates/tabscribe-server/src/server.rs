//! `ApiServer` — router construction and the listen loop.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{DefaultBodyLimit, State};
use axum::response::Json;
use axum::routing::{get, post};
use tokio::task::JoinHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use tabscribe_dataset::Table;

use crate::config::ServerConfig;
use crate::handlers;
use crate::health::{self, HealthResponse};
use crate::shutdown::ShutdownCoordinator;
use crate::traits::Transcriber;

/// Shared state injected into every handler.
///
/// The table is immutable after load and the transcriber is internally
/// synchronized, so cloning this into concurrent requests is safe.
#[derive(Clone)]
pub struct AppState {
    /// The dataset behind `/get-data`.
    pub table: Arc<Table>,
    /// The speech-recognition backend behind `/transcribe_audio`.
    pub transcriber: Arc<dyn Transcriber>,
    /// Directory for per-request audio spool files.
    pub spool_dir: PathBuf,
    /// Model identifier, reported by `/health`.
    pub model: String,
    /// When the server started.
    pub start_time: Instant,
}

/// The tabscribe HTTP server.
pub struct ApiServer {
    config: ServerConfig,
    state: AppState,
    shutdown: Arc<ShutdownCoordinator>,
}

impl ApiServer {
    /// Assemble a server from its injected dependencies.
    pub fn new(config: ServerConfig, table: Arc<Table>, transcriber: Arc<dyn Transcriber>) -> Self {
        let state = AppState {
            table,
            transcriber,
            spool_dir: config.spool_dir.clone(),
            model: config.model.clone(),
            start_time: Instant::now(),
        };
        Self {
            config,
            state,
            shutdown: Arc::new(ShutdownCoordinator::new()),
        }
    }

    /// Build the axum router with all routes and middleware.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/get-data", get(handlers::data::get_data))
            .route("/transcribe_audio", post(handlers::transcribe::transcribe_audio))
            .layer(DefaultBodyLimit::max(self.config.max_upload_bytes))
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Bind and start serving on a background task.
    ///
    /// Returns the bound address (useful with port `0`) and the serve task's
    /// handle. The task exits once [`Self::shutdown`] fires and in-flight
    /// requests finish.
    pub async fn listen(&self) -> std::io::Result<(SocketAddr, JoinHandle<()>)> {
        let listener =
            tokio::net::TcpListener::bind((self.config.host.as_str(), self.config.port)).await?;
        let addr = listener.local_addr()?;

        let app = self.router();
        let token = self.shutdown.token();
        let handle = tokio::spawn(async move {
            let serve = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await });
            if let Err(e) = serve.await {
                tracing::error!(error = %e, "server terminated abnormally");
            }
        });

        Ok((addr, handle))
    }

    /// The shutdown coordinator.
    pub fn shutdown(&self) -> &Arc<ShutdownCoordinator> {
        &self.shutdown
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// GET /health
async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(health::health_check(
        state.start_time,
        state.table.len(),
        &state.model,
    ))
}

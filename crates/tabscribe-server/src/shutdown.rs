//! Graceful shutdown coordination via `CancellationToken`.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// How long to wait for in-flight requests before giving up.
const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Signals the serve task (and anything else holding a token) to stop.
#[derive(Default)]
pub struct ShutdownCoordinator {
    token: CancellationToken,
}

impl ShutdownCoordinator {
    /// Create a new coordinator.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// A token that resolves once shutdown begins.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Initiate shutdown. Idempotent.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Whether shutdown has been initiated.
    pub fn is_shutting_down(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Cancel and wait for the serve task to drain, up to `timeout`
    /// (default 15s). Logs a warning when the drain times out.
    pub async fn drain(&self, handle: JoinHandle<()>, timeout: Option<Duration>) {
        let timeout = timeout.unwrap_or(DEFAULT_DRAIN_TIMEOUT);
        self.shutdown();
        info!(timeout_secs = timeout.as_secs(), "draining in-flight requests");
        if tokio::time::timeout(timeout, handle).await.is_err() {
            warn!("shutdown drain timed out after {timeout:?}");
        }
    }
}

//! Connection lifecycle notifications.

use crate::error::CacheError;
use tracing::{error, info};

/// Receives cache connection lifecycle notifications.
///
/// Callbacks are advisory. They run inline on the connecting task and must
/// not block.
pub trait CacheObserver: Send + Sync {
    /// The transport and handshake (`AUTH`, `SELECT`) completed.
    fn on_connect(&self, address: &str);

    /// The liveness `PING` succeeded; the client is usable.
    fn on_ready(&self, address: &str);

    /// A connect attempt or a [`ping`](crate::CacheConnector::ping) on the
    /// connected client failed.
    ///
    /// Errors returned by commands issued directly on a client handle are
    /// seen only by the caller and are not reported here.
    fn on_error(&self, address: &str, error: &CacheError);
}

/// Forwards every notification to the process logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingObserver;

impl CacheObserver for LoggingObserver {
    fn on_connect(&self, address: &str) {
        info!(cache = %address, "Redis client connected");
    }

    fn on_ready(&self, address: &str) {
        info!(cache = %address, "Redis client ready");
    }

    fn on_error(&self, address: &str, error: &CacheError) {
        error!(cache = %address, error = %error, "Redis client error");
    }
}

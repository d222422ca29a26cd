//! Startup failures. Every variant ends the process with exit code 1.

use crate::config::ConfigError;
use thiserror::Error;
use ticket_trader_cache::CacheError;
use ticket_trader_postgres::DatabaseError;

/// Result type for startup and serving.
pub type Result<T> = std::result::Result<T, StartupError>;

/// Fatal errors raised while bringing the server up or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The database connector failed to connect.
    #[error("database startup failed: {0}")]
    Database(#[from] DatabaseError),

    /// The cache connector failed to connect.
    #[error("cache startup failed: {0}")]
    Cache(#[from] CacheError),

    /// The listener could not be bound.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Requested address
        address: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

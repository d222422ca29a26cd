//! Cache connector errors.

use redis::RedisError;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for cache connector operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Failures of the cache connector.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The client could not be built from the configuration.
    #[error("invalid cache client configuration: {0}")]
    Client(#[source] RedisError),

    /// The remote store was unreachable or rejected authentication.
    #[error("failed to connect to cache {address}: {source}")]
    Connect {
        /// Redacted connection target
        address: String,
        /// Driver error
        #[source]
        source: RedisError,
    },

    /// Connected, but `PING` did not succeed.
    #[error("cache liveness check failed: {0}")]
    Verify(#[source] RedisError),

    /// Connecting and verifying did not finish in time.
    #[error("cache connection attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The client was requested before a successful `connect()`.
    #[error("cache client not initialized: call connect() first")]
    Uninitialized,
}

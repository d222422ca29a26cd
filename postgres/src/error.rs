//! Database connector errors.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for database connector operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

/// Failures of the database connector.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// The pool could not open a connection (unreachable host, bad credentials, ...).
    #[error("failed to connect to database {address}: {source}")]
    Connect {
        /// Redacted connection target
        address: String,
        /// Driver error
        #[source]
        source: sqlx::Error,
    },

    /// A connection was opened but the liveness query failed.
    #[error("database liveness check failed: {0}")]
    Verify(#[source] sqlx::Error),

    /// Connecting and verifying did not finish in time.
    #[error("database connection attempt timed out after {0:?}")]
    Timeout(Duration),

    /// The pool was requested before a successful `connect()`.
    #[error("database not initialized: call connect() first")]
    Uninitialized,
}

//! Pooled `PostgreSQL` connection lifecycle.

use crate::config::DatabaseConfig;
use crate::error::{DatabaseError, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection, PgPool};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

/// Owns the database pool for the lifetime of the process.
///
/// The pool exists only between a successful [`connect`](Self::connect) and
/// [`close`](Self::close). Repeated or concurrent `connect()` calls are
/// serialized; once connected, later calls return the existing pool.
pub struct DatabaseConnector {
    config: DatabaseConfig,
    pool: Mutex<Option<PgPool>>,
}

impl DatabaseConnector {
    /// Create a connector. No I/O happens until [`connect`](Self::connect).
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: Mutex::new(None),
        }
    }

    /// Configuration this connector was built with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Open one connection, verify it with `SELECT 1`, then build the pool.
    ///
    /// The whole attempt is bounded by `connect_timeout`. Nothing is retried:
    /// a refused or unresolvable host fails on the first attempt.
    ///
    /// # Errors
    ///
    /// - [`DatabaseError::Connect`] if the host is unreachable or rejects the credentials
    /// - [`DatabaseError::Verify`] if the liveness query fails
    /// - [`DatabaseError::Timeout`] if the attempt exceeds `connect_timeout`
    pub async fn connect(&self) -> Result<PgPool> {
        let mut slot = self.pool.lock().await;
        if let Some(pool) = slot.as_ref() {
            debug!("Database already connected, reusing pool");
            return Ok(pool.clone());
        }

        let address = self.config.redacted_url();
        let timeout = self.config.connect_timeout;

        let result = match tokio::time::timeout(timeout, self.open_verified_pool(&address)).await {
            Ok(result) => result,
            Err(_) => Err(DatabaseError::Timeout(timeout)),
        };

        match result {
            Ok(pool) => {
                info!(
                    database = %address,
                    min_connections = self.config.min_connections,
                    max_connections = self.config.max_connections,
                    "Database connection established"
                );
                *slot = Some(pool.clone());
                Ok(pool)
            }
            Err(e) => {
                error!(database = %address, error = %e, "Database connection failed");
                Err(e)
            }
        }
    }

    async fn open_verified_pool(&self, address: &str) -> Result<PgPool> {
        let options = self.config.connect_options();

        // A single connection attempt. The pool's own connect retries with
        // backoff until `acquire_timeout`, so it is only built afterwards.
        let mut conn = PgConnection::connect_with(&options)
            .await
            .map_err(|source| DatabaseError::Connect {
                address: address.to_string(),
                source,
            })?;

        let verified = sqlx::query("SELECT 1").execute(&mut conn).await;
        if let Err(e) = conn.close().await {
            debug!(error = %e, "Verification connection did not close cleanly");
        }
        verified.map_err(DatabaseError::Verify)?;

        Ok(PgPoolOptions::new()
            .min_connections(self.config.min_connections)
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.connect_timeout)
            .connect_lazy_with(options))
    }

    /// The connected pool.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Uninitialized`] before a successful `connect()`
    /// or after `close()`.
    pub async fn pool(&self) -> Result<PgPool> {
        self.pool
            .lock()
            .await
            .clone()
            .ok_or(DatabaseError::Uninitialized)
    }

    /// Whether a verified pool is currently held.
    pub async fn is_connected(&self) -> bool {
        self.pool.lock().await.is_some()
    }

    /// Re-run the liveness query against the connected pool.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseError::Uninitialized`] when not connected and
    /// [`DatabaseError::Verify`] when the round trip fails.
    pub async fn ping(&self) -> Result<()> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map(|_| ())
            .map_err(DatabaseError::Verify)
    }

    /// Close the pool and forget it. No-op when not connected.
    pub async fn close(&self) {
        let pool = self.pool.lock().await.take();
        match pool {
            Some(pool) => {
                pool.close().await;
                info!(database = %self.config.redacted_url(), "Database connection closed");
            }
            None => debug!("Database close requested while not connected"),
        }
    }
}

//! Resource bring-up for the API server.
//!
//! Connects the infrastructure the server depends on, in a fixed order:
//!
//! 1. `PostgreSQL` (pool built and verified with `SELECT 1`)
//! 2. Redis (client connected and verified with `PING`)
//!
//! The steps are sequential. The first failure aborts bring-up; nothing is
//! retried and no degraded mode exists.

use crate::config::Config;
use crate::error::Result;
use std::sync::Arc;
use ticket_trader_cache::CacheConnector;
use ticket_trader_postgres::DatabaseConnector;
use tracing::info;

/// Connected infrastructure owned by the running server.
#[derive(Clone)]
pub struct Resources {
    /// Connected `PostgreSQL` connector
    pub database: Arc<DatabaseConnector>,

    /// Connected Redis connector
    pub cache: Arc<CacheConnector>,
}

impl Resources {
    /// Connect every resource described by `config`.
    ///
    /// # Errors
    ///
    /// Returns the first connector failure. A connected database is closed
    /// again when the cache fails.
    pub async fn connect(config: &Config) -> Result<Self> {
        let database = Arc::new(DatabaseConnector::new(config.database.clone()));
        let cache = Arc::new(CacheConnector::new(config.cache.clone()));

        Self::connect_with(database, cache).await
    }

    /// Connect pre-built connectors in bring-up order.
    ///
    /// # Errors
    ///
    /// Returns the first connector failure. A connected database is closed
    /// again when the cache fails.
    pub async fn connect_with(
        database: Arc<DatabaseConnector>,
        cache: Arc<CacheConnector>,
    ) -> Result<Self> {
        info!(database = %database.config().redacted_url(), "Connecting to database...");
        database.connect().await?;
        info!("✓ Database ready");

        info!(cache = %cache.config().redacted_url(), "Connecting to cache...");
        if let Err(e) = cache.connect().await {
            database.close().await;
            return Err(e.into());
        }
        info!("✓ Cache ready");

        Ok(Self { database, cache })
    }

    /// Close the cache, then the database (reverse bring-up order).
    pub async fn close(&self) {
        self.cache.close().await;
        self.database.close().await;
    }
}

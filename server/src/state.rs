//! Application state for the HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Process state (clock, environment, start instant)
//! - Database connector
//! - Cache connector

use crate::config::Config;
use axum::extract::FromRef;
use std::sync::Arc;
use ticket_trader_cache::CacheConnector;
use ticket_trader_postgres::DatabaseConnector;
use ticket_trader_web::ProcessState;

/// Application state shared across all HTTP handlers.
///
/// It's cloned (cheaply via Arc) for each request. The connectors are owned
/// here rather than in globals; domain handlers reach them through
/// `State<AppState>` or a `FromRef` projection.
#[derive(Clone)]
pub struct AppState {
    /// Clock, environment profile and uptime
    pub process: ProcessState,

    /// `PostgreSQL` pool owner
    pub database: Arc<DatabaseConnector>,

    /// Redis client owner
    pub cache: Arc<CacheConnector>,

    /// Loaded configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(
        process: ProcessState,
        database: Arc<DatabaseConnector>,
        cache: Arc<CacheConnector>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            process,
            database,
            cache,
            config,
        }
    }
}

// Lets the shared web handlers and middleware extract `State<ProcessState>`
impl FromRef<AppState> for ProcessState {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.process.clone()
    }
}

impl FromRef<AppState> for Arc<DatabaseConnector> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.database.clone()
    }
}

impl FromRef<AppState> for Arc<CacheConnector> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.cache.clone()
    }
}

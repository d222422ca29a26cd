//! Health check endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems to
//! verify the process is up. They do NOT check the database or cache.

use crate::state::ProcessState;
use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use ticket_trader_core::constants::{Environment, SERVICE_NAME};

/// Version reported by [`api_info`].
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    /// Always `"OK"`
    pub status: String,
    /// ISO-8601 time the response was produced
    pub timestamp: String,
    /// Seconds since process start
    pub uptime: f64,
    /// Active environment profile
    pub environment: Environment,
}

/// Body of `GET /api`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service name
    pub message: String,
    /// Service version
    pub version: String,
    /// ISO-8601 time the response was produced
    pub timestamp: String,
}

/// Liveness check.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "OK",
///   "timestamp": "2025-01-01T00:00:00.000Z",
///   "uptime": 12.5,
///   "environment": "development"
/// }
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check(State(process): State<ProcessState>) -> (StatusCode, Json<HealthStatus>) {
    let health = HealthStatus {
        status: "OK".to_string(),
        timestamp: process.timestamp(),
        uptime: process.uptime().as_secs_f64(),
        environment: process.environment(),
    };

    (StatusCode::OK, Json(health))
}

/// Service name and version.
///
/// # Endpoint
///
/// ```text
/// GET /api
/// ```
#[allow(clippy::unused_async)]
pub async fn api_info(State(process): State<ProcessState>) -> (StatusCode, Json<ServiceInfo>) {
    let info = ServiceInfo {
        message: SERVICE_NAME.to_string(),
        version: API_VERSION.to_string(),
        timestamp: process.timestamp(),
    };

    (StatusCode::OK, Json(info))
}

//! Process-wide leveled logger.
//!
//! Every crate logs through the `tracing` macros; this module installs the
//! single global subscriber that writes those records to the console.
//!
//! - `RUST_LOG`, when set and valid, wins.
//! - Otherwise the level comes from `LOG_LEVEL` or the environment profile
//!   (`debug` outside production, `info` in production).
//! - Production writes JSON lines; other profiles write compact text.

use crate::constants::Environment;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Logging setup failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The computed filter directive could not be parsed.
    #[error("invalid log filter `{directive}`: {reason}")]
    InvalidFilter {
        /// Directive that failed to parse
        directive: String,
        /// Parser message
        reason: String,
    },

    /// A global subscriber is already installed.
    #[error("global logger already initialized")]
    AlreadyInitialized,
}

/// Default level for a profile.
#[must_use]
pub const fn default_level(environment: Environment) -> &'static str {
    if environment.is_production() {
        "info"
    } else {
        "debug"
    }
}

/// Filter directive used when `RUST_LOG` is absent.
///
/// Our own crates log at `level`; noisy dependencies are capped.
#[must_use]
pub fn default_directive(environment: Environment, level: Option<&str>) -> String {
    let level = level.unwrap_or_else(|| default_level(environment));
    format!("info,ticket_trader={level},sqlx=warn,tower_http=info")
}

/// Install the global subscriber.
///
/// # Errors
///
/// Returns [`LoggingError::InvalidFilter`] if `level` produces an unparseable
/// directive and [`LoggingError::AlreadyInitialized`] if a subscriber was
/// installed earlier.
pub fn init(environment: Environment, level: Option<&str>) -> Result<(), LoggingError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = default_directive(environment, level);
            EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidFilter {
                directive: directive.clone(),
                reason: e.to_string(),
            })?
        }
    };

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if environment.is_production() {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .try_init()
    } else {
        registry.with(fmt::layer().compact()).try_init()
    };

    installed.map_err(|_| LoggingError::AlreadyInitialized)
}

//! Ticket Trader API server.
//!
//! # Usage
//!
//! ```bash
//! # Start infrastructure
//! docker compose up -d postgres redis
//!
//! # Run server
//! cargo run --bin ticket-trader
//! ```
//!
//! Exits with code 0 after a SIGINT/SIGTERM shutdown and 1 when startup
//! fails.

use std::process::ExitCode;
use ticket_trader_core::{Environment, logging};
use ticket_trader_server::lifecycle::shutdown_signal;
use ticket_trader_server::{Application, Config, ConfigError, StartupError};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // The logger needs the profile; fall back to defaults so a config error
    // can still be reported through it.
    let (environment, log_level) = match &config {
        Ok(config) => (config.environment, config.server.log_level.clone()),
        Err(_) => (Environment::default(), None),
    };
    if let Err(e) = logging::init(environment, log_level.as_deref()) {
        eprintln!("Failed to initialize logger: {e}");
        return ExitCode::FAILURE;
    }

    match start(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, debug = ?e, "Failed to start server");
            ExitCode::FAILURE
        }
    }
}

async fn start(config: Result<Config, ConfigError>) -> Result<(), StartupError> {
    let config = config?;
    tracing::info!(%config, "🎫 Starting Ticket Trader API...");

    Application::start(config, shutdown_signal()).await
}

//! Application lifecycle management and graceful shutdown.
//!
//! 1. **Startup**: connect resources, then bind the listener
//! 2. **Runtime**: serve HTTP until a shutdown signal arrives
//! 3. **Shutdown**: drain in-flight requests (bounded), close resources
//!
//! # Graceful Shutdown
//!
//! A signal received during startup abandons bring-up; connectors that
//! already succeeded are dropped and the process exits with code 0.
//!
//! When SIGINT (Ctrl+C) or SIGTERM is received while serving:
//! 1. The listener stops accepting new connections
//! 2. In-flight requests get at most `SHUTDOWN_TIMEOUT` to finish
//! 3. The cache connector is closed, then the database connector
//! 4. `run()` returns `Ok(())` and the process exits with code 0
//!
//! # Example
//!
//! ```rust,ignore
//! let config = Config::from_env()?;
//! Application::start(config, shutdown_signal()).await?;
//! ```

use crate::bootstrap::Resources;
use crate::config::Config;
use crate::error::{Result, StartupError};
use crate::routes::build_router;
use crate::state::AppState;
use futures::FutureExt;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use ticket_trader_web::ProcessState;
use tracing::{error, info, warn};

/// Running application: connected resources plus a bound listener.
///
/// # Lifecycle
///
/// 1. Created via [`Application::build`] (resources first, listener last)
/// 2. Started via [`Application::run`]
/// 3. Runs until a shutdown signal is received
/// 4. Drains, closes resources and returns
pub struct Application {
    /// TCP listener for HTTP server
    listener: TcpListener,

    /// Axum router with all HTTP routes
    router: axum::Router,

    /// Connected infrastructure
    resources: Resources,

    /// Upper bound for draining in-flight requests
    shutdown_timeout: Duration,
}

impl Application {
    /// Bring the application up and serve until `shutdown` completes.
    ///
    /// `shutdown` is watched from the first step: if it completes while
    /// resources are still connecting, bring-up is abandoned and `Ok(())` is
    /// returned without binding the listener.
    ///
    /// # Errors
    ///
    /// Returns the first bring-up failure, or [`StartupError::Serve`] if the
    /// server fails.
    pub async fn start<F>(config: Config, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let shutdown = shutdown.shared();

        let app = tokio::select! {
            biased;
            () = shutdown.clone() => {
                info!("Shutdown requested during startup, abandoning bring-up");
                return Ok(());
            }
            built = Self::build(config) => built?,
        };
        info!("✓ Application initialized");

        app.run_until(shutdown).await
    }

    /// Bring the application up.
    ///
    /// Connects the database, then the cache, then binds the listener. A
    /// failure at any step stops the sequence, so a failed connector means
    /// the listener is never bound.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the database or cache cannot be reached within its connect timeout
    /// - the listener address cannot be bound
    pub async fn build(config: Config) -> Result<Self> {
        let process = ProcessState::system(config.environment);
        let config = Arc::new(config);

        let resources = Resources::connect(&config).await?;

        let state = AppState::new(
            process,
            resources.database.clone(),
            resources.cache.clone(),
            config.clone(),
        );
        let router = build_router(state);

        let address = config.server.address();
        let listener = match TcpListener::bind(&address).await {
            Ok(listener) => listener,
            Err(source) => {
                resources.close().await;
                return Err(StartupError::Bind { address, source });
            }
        };

        Ok(Self {
            listener,
            router,
            resources,
            shutdown_timeout: config.server.shutdown_timeout,
        })
    }

    /// Address the listener is bound to.
    ///
    /// # Errors
    ///
    /// Returns error if the socket address cannot be read.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve until SIGINT or SIGTERM, then shut down gracefully.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Serve`] if the server fails.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then shut down gracefully.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Serve`] if the server fails.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.local_addr() {
            Ok(address) => {
                info!(address = %address, "HTTP server listening for requests");
                info!("Health check available at http://{address}/health");
            }
            Err(e) => warn!(error = %e, "HTTP server listening on unknown address"),
        }

        let (drain_tx, mut drain_rx) = watch::channel(false);
        let signal = async move {
            shutdown.await;
            info!("Shutdown requested, draining in-flight requests...");
            let _ = drain_tx.send(true);
        };

        let server = axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .into_future();

        let timeout = self.shutdown_timeout;
        let drain_deadline = async move {
            let draining = drain_rx.wait_for(|draining| *draining).await.is_ok();
            if draining {
                tokio::time::sleep(timeout).await;
            } else {
                std::future::pending::<()>().await;
            }
        };

        let served = tokio::select! {
            result = server => result.map_err(StartupError::Serve),
            () = drain_deadline => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "Drain timed out, abandoning in-flight requests"
                );
                Ok(())
            }
        };

        info!("HTTP server stopped, closing resources...");
        self.resources.close().await;
        info!("Graceful shutdown complete");

        served
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT signal");
        }
        () = terminate => {
            info!("Received SIGTERM signal");
        }
    }
}

//! # Ticket Trader Server
//!
//! Wires the Ticket Trader crates into a running HTTP API:
//!
//! - **Configuration**: [`Config`] loaded from environment variables
//! - **Bootstrap**: sequential bring-up of the database and the cache
//! - **Routes**: `/health`, `/api`, the not-found fallback and the shared
//!   middleware stack
//! - **Lifecycle**: serving, signal handling and graceful shutdown
//!
//! ## Startup
//!
//! ```text
//! load config ─► init logger ─► connect database ─► connect cache ─► bind listener ─► serve
//!                                     │                   │               │
//!                                     └──── any failure: log, exit 1 ─────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use ticket_trader_server::{Application, Config, lifecycle::shutdown_signal};
//!
//! let config = Config::from_env()?;
//! Application::start(config, shutdown_signal()).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod routes;
pub mod state;

pub use bootstrap::Resources;
pub use config::{Config, ConfigError, ServerConfig};
pub use error::StartupError;
pub use lifecycle::Application;
pub use routes::build_router;
pub use state::AppState;

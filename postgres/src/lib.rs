//! `PostgreSQL` connector for Ticket Trader.
//!
//! This crate owns the lifecycle of the relational store connection:
//!
//! - Pool construction with fixed min/max bounds
//! - A verified round trip (`SELECT 1`) before reporting success
//! - A bounded connect attempt (no retries)
//! - Idempotent teardown
//!
//! The connector is an explicitly owned value; nothing here is global.
//!
//! # Example
//!
//! ```ignore
//! use ticket_trader_postgres::{DatabaseConfig, DatabaseConnector};
//! use ticket_trader_core::Environment;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let connector = DatabaseConnector::new(DatabaseConfig::for_environment(Environment::Development));
//!     let pool = connector.connect().await?;
//!     sqlx::query("SELECT 1").execute(&pool).await?;
//!     connector.close().await;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod connector;
pub mod error;

pub use config::DatabaseConfig;
pub use connector::DatabaseConnector;
pub use error::DatabaseError;

/// Re-exported so callers can name the pool type without depending on sqlx.
pub use sqlx::PgPool;

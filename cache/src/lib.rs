//! Redis connector for Ticket Trader.
//!
//! Mirrors the database connector: an explicitly owned [`CacheConnector`]
//! that connects once, verifies with `PING`, and hands out clones of a
//! multiplexed [`ConnectionManager`]. Asking for the client before a
//! successful connect is an error, never a lazy connect.
//!
//! Connection lifecycle notifications (`connect`, `ready`, `error`) go to a
//! [`CacheObserver`]. The default [`LoggingObserver`] writes them to the log;
//! observers never influence control flow.
//!
//! # Example
//!
//! ```ignore
//! use ticket_trader_cache::{CacheConfig, CacheConnector};
//! use redis::AsyncCommands;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let connector = CacheConnector::new(CacheConfig::default());
//!     connector.connect().await?;
//!
//!     let mut conn = connector.client().await?;
//!     let _: () = conn.set("listing:42:views", 1).await?;
//!
//!     connector.close().await;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod connector;
pub mod error;
pub mod observer;

pub use config::CacheConfig;
pub use connector::CacheConnector;
pub use error::CacheError;
pub use observer::{CacheObserver, LoggingObserver};

/// Re-exported so callers can name the client type without depending on redis.
pub use redis::aio::ConnectionManager;

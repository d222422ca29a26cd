//! # Ticket Trader Core
//!
//! Shared building blocks for every Ticket Trader crate.
//!
//! This crate has no knowledge of HTTP servers, databases or caches. It provides
//! the leaves of the dependency graph:
//!
//! - **Constants**: environment profiles, the HTTP status enumeration,
//!   pagination defaults and the well-known strings of the error contract
//! - **Clock**: an injectable time source so timestamps are testable
//! - **Logging**: process-wide `tracing` subscriber setup
//!
//! ## Example
//!
//! ```ignore
//! use ticket_trader_core::{constants::Environment, logging};
//!
//! let environment: Environment = "production".parse()?;
//! logging::init(environment, None)?;
//! tracing::info!(environment = %environment, "Logger ready");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod constants;
pub mod logging;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use clock::{Clock, SystemClock};
pub use constants::{Environment, Pagination, StatusCode};

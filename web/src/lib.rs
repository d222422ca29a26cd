//! Axum integration for Ticket Trader.
//!
//! This crate owns the HTTP-facing contract shared by every route:
//!
//! - **Errors**: [`AppError`] separates operational failures (shown to the
//!   client) from internal ones (masked as `500 Internal Server Error`)
//! - **Error envelope**: every 4xx/5xx leaves the server as
//!   `{ "error": { code, message, timestamp, requestId } }`
//! - **Request tracking**: per-request tracing span keyed by `x-request-id`
//! - **Built-in handlers**: `/health`, `/api` and the not-found fallback
//!
//! # Request Flow
//!
//! 1. **Request span** opens with the client's request id (or `"unknown"`)
//! 2. **Envelope middleware** remembers method, URL and request id
//! 3. **Handler** runs; failures return `AppError`, panics are caught
//! 4. **Envelope middleware** logs the failure and writes the envelope
//!
//! # Example
//!
//! ```ignore
//! use ticket_trader_web::{AppError, ProcessState};
//! use axum::{Router, routing::get, Json};
//!
//! async fn listing(Path(id): Path<u64>) -> Result<Json<Listing>, AppError> {
//!     let listing = find_listing(id).await.map_err(AppError::internal)?;
//!     listing.map(Json).ok_or_else(|| AppError::not_found("Listing", id))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod state;

// Re-export key types for convenience
pub use error::{AppError, ErrorBody, ErrorEnvelope, ErrorReport};
pub use extractors::RequestId;
pub use middleware::{error_envelope, panic_response, request_span_layer};
pub use state::ProcessState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;

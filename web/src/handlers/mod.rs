//! Built-in HTTP handlers.
//!
//! - `health`: liveness and service info endpoints
//! - `not_found`: fallback for requests that match no route

pub mod health;
pub mod not_found;

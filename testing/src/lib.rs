//! # Ticket Trader Testing
//!
//! Testing utilities and helpers shared by the Ticket Trader crates.
//!
//! This crate provides:
//! - `FixedClock`: deterministic time for handlers and middleware
//! - HTTP helpers for driving an `axum::Router` in-process and inspecting
//!   JSON bodies
//! - Assertions for the error envelope contract
//!
//! ## Example
//!
//! ```ignore
//! use ticket_trader_testing::{get, read_json, assert_error_envelope};
//! use tower::ServiceExt;
//!
//! #[tokio::test]
//! async fn test_unknown_route() {
//!     let response = router.oneshot(get("/nonexistent")).await?;
//!     let body = read_json(response).await?;
//!     assert_error_envelope(&body, 404, "Route GET /nonexistent not found");
//! }
//! ```

use chrono::{DateTime, Utc};
use ticket_trader_core::clock::Clock;

/// Mock implementations of injected dependencies.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_trader_testing::mocks::FixedClock;
    /// use ticket_trader_core::clock::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// [`test_clock`]'s instant as it appears in response bodies.
    pub const TEST_CLOCK_TIMESTAMP: &str = "2025-01-01T00:00:00.000Z";
}

/// Helpers for exercising routers in-process.
pub mod requests {
    use axum::body::{Body, to_bytes};
    use axum::response::Response;
    use http::{Method, Request};
    use serde_json::Value;
    use thiserror::Error;

    /// Failures while building requests or reading responses in tests.
    #[derive(Debug, Error)]
    pub enum TestHttpError {
        /// Request could not be constructed.
        #[error("invalid test request: {0}")]
        Request(#[from] http::Error),
        /// Body could not be collected.
        #[error("failed to read response body: {0}")]
        Body(#[from] axum::Error),
        /// Body was not valid JSON.
        #[error("response body is not JSON: {0}")]
        Json(#[from] serde_json::Error),
    }

    /// Build a bodiless request.
    ///
    /// # Errors
    ///
    /// Returns error if `uri` is not a valid request target.
    pub fn request(method: Method, uri: &str) -> Result<Request<Body>, TestHttpError> {
        Ok(Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())?)
    }

    /// Build a `GET` request.
    ///
    /// # Errors
    ///
    /// Returns error if `uri` is not a valid request target.
    pub fn get(uri: &str) -> Result<Request<Body>, TestHttpError> {
        request(Method::GET, uri)
    }

    /// Collect a response body and parse it as JSON.
    ///
    /// # Errors
    ///
    /// Returns error if the body cannot be read or is not JSON.
    pub async fn read_json(response: Response) -> Result<Value, TestHttpError> {
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Assertion helpers for the error envelope contract.
pub mod assertions {
    use serde_json::Value;

    /// Assert that `body` is exactly `{ error: { code, message, timestamp, requestId } }`
    /// with the given code and message.
    pub fn assert_error_envelope(body: &Value, code: u16, message: &str) {
        let error = &body["error"];
        assert_eq!(error["code"], Value::from(code), "envelope code in {body}");
        assert_eq!(error["message"], Value::from(message), "envelope message in {body}");
        assert!(error["timestamp"].is_string(), "envelope timestamp in {body}");
        assert!(error["requestId"].is_string(), "envelope requestId in {body}");
        assert_eq!(body.as_object().map(serde_json::Map::len), Some(1), "top-level keys in {body}");
        assert_eq!(error.as_object().map(serde_json::Map::len), Some(4), "envelope keys in {body}");
    }
}

// Re-export commonly used items
pub use assertions::assert_error_envelope;
pub use requests::{get, read_json, request};
pub use mocks::{FixedClock, TEST_CLOCK_TIMESTAMP, test_clock};

#[cfg(test)]
mod tests {
    use super::*;
    use ticket_trader_core::clock::format_timestamp;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
        assert_eq!(format_timestamp(time1), TEST_CLOCK_TIMESTAMP);
    }

    #[test]
    fn test_envelope_assertion_accepts_contract_shape() {
        let body = serde_json::json!({
            "error": {
                "code": 404,
                "message": "Route GET /x not found",
                "timestamp": TEST_CLOCK_TIMESTAMP,
                "requestId": "unknown"
            }
        });
        assert_error_envelope(&body, 404, "Route GET /x not found");
    }

    #[tokio::test]
    async fn test_read_json_parses_body() {
        let response = axum::response::Response::new(axum::body::Body::from(r#"{"status":"OK"}"#));
        let body = read_json(response).await;
        assert!(matches!(body, Ok(ref value) if value["status"] == "OK"));
    }
}

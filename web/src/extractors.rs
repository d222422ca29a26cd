//! Custom Axum extractors.
//!
//! - `RequestId`: the client-supplied `x-request-id` header, if any
//!
//! # Examples
//!
//! ```ignore
//! use ticket_trader_web::extractors::RequestId;
//!
//! async fn handler(request_id: RequestId) -> Result<Json<Response>, AppError> {
//!     tracing::info!(request_id = %request_id.as_str(), "Processing request");
//!     Ok(Json(response))
//! }
//! ```

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
};
use ticket_trader_core::constants::{REQUEST_ID_HEADER, UNKNOWN_REQUEST_ID};

/// Request identifier supplied by the client.
///
/// The server never generates one. A missing, empty or non-UTF-8 header is
/// reported as `"unknown"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestId(pub Option<String>);

impl RequestId {
    /// Read the identifier from request headers.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Self(id)
    }

    /// The identifier, or `"unknown"` when the client sent none.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_deref().unwrap_or(UNKNOWN_REQUEST_ID)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

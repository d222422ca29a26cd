//! Error types for web handlers.
//!
//! Every failure a handler can produce is an [`AppError`], which is one of
//! two explicit categories:
//!
//! - **Operational**: an expected condition (validation failure, missing
//!   resource, conflict). Its status and message reach the client verbatim.
//! - **Internal**: anything unexpected. The client only ever sees
//!   `500 Internal Server Error`; the cause is logged server-side.
//!
//! `AppError` implements Axum's `IntoResponse`. The response carries an
//! [`ErrorReport`] extension that the error envelope middleware turns into
//! the final JSON body and the audit log line.

use axum::{
    Json,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use ticket_trader_core::clock::{Clock, SystemClock, format_timestamp};
use ticket_trader_core::constants::{INTERNAL_SERVER_ERROR_MESSAGE, UNKNOWN_REQUEST_ID};

/// Application error type for web handlers.
///
/// # Examples
///
/// ```ignore
/// async fn reserve(Path(id): Path<ListingId>) -> Result<Json<Reservation>, AppError> {
///     let listing = listings.find(id).await.map_err(AppError::internal)?;
///     if listing.remaining == 0 {
///         return Err(AppError::conflict("Ticket sold out"));
///     }
///     Ok(Json(listing.reserve()))
/// }
/// ```
#[derive(Debug)]
pub enum AppError {
    /// Expected failure, safe to show to the client.
    Operational {
        /// HTTP status code
        status: StatusCode,
        /// User-facing message
        message: String,
    },

    /// Unexpected failure; the cause is logged, never returned.
    Internal(anyhow::Error),
}

impl AppError {
    /// Create an operational error with an explicit status.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Operational {
            status,
            message: message.into(),
        }
    }

    /// Wrap an unexpected failure.
    #[must_use]
    pub fn internal(error: impl Into<anyhow::Error>) -> Self {
        Self::Internal(error.into())
    }

    /// Create a 400 Bad Request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Create a 401 Unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Create a 403 Forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Create a 404 Not Found error for a resource.
    #[must_use]
    pub fn not_found(resource: impl fmt::Display, id: impl fmt::Display) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("{resource} with id {id} not found"),
        )
    }

    /// Create the 404 reported for requests that matched no route.
    #[must_use]
    pub fn route_not_found(method: &Method, path: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("Route {method} {path} not found"),
        )
    }

    /// Create a 409 Conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Create a 422 Unprocessable Entity error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Create a 503 Service Unavailable error.
    #[must_use]
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Status code sent to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Operational { status, .. } => *status,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Internal causes are never exposed.
    #[must_use]
    pub fn public_message(&self) -> &str {
        match self {
            Self::Operational { message, .. } => message,
            Self::Internal(_) => INTERNAL_SERVER_ERROR_MESSAGE,
        }
    }

    /// Whether this is an expected, client-safe failure.
    #[must_use]
    pub const fn is_operational(&self) -> bool {
        matches!(self, Self::Operational { .. })
    }

    fn report(&self) -> ErrorReport {
        ErrorReport {
            status: self.status(),
            message: self.public_message().to_string(),
            operational: self.is_operational(),
            detail: match self {
                Self::Operational { .. } => None,
                Self::Internal(e) => Some(format!("{e:?}")),
            },
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operational { status, message } => write!(f, "[{}] {message}", status.as_u16()),
            Self::Internal(e) => write!(f, "[500] {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Operational { .. } => None,
            Self::Internal(e) => Some(e.as_ref()),
        }
    }
}

/// Convert `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Resolved failure attached to an error response as an extension.
///
/// The envelope middleware reads it to log the failure with request context
/// and to write the final body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Status sent to the client
    pub status: StatusCode,
    /// Client-facing message
    pub message: String,
    /// Operational (expected) or internal failure
    pub operational: bool,
    /// Server-side detail: the cause chain (and backtrace, when captured)
    pub detail: Option<String>,
}

impl ErrorReport {
    /// Report for a response the framework produced without an `AppError`
    /// (method not allowed, extractor rejections, body limits, ...).
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        let message = if status.is_server_error() {
            INTERNAL_SERVER_ERROR_MESSAGE
        } else {
            status.canonical_reason().unwrap_or("Request Failed")
        };

        Self {
            status,
            message: message.to_string(),
            operational: status.is_client_error(),
            detail: None,
        }
    }

    /// Build the wire envelope for this report.
    #[must_use]
    pub fn envelope(&self, clock: &dyn Clock, request_id: &str) -> ErrorEnvelope {
        ErrorEnvelope {
            error: ErrorBody {
                code: self.status.as_u16(),
                message: self.message.clone(),
                timestamp: format_timestamp(clock.now()),
                request_id: request_id.to_string(),
            },
        }
    }

    /// Render the JSON response for this report, keeping the report attached.
    #[must_use]
    pub fn into_response_with(self, clock: &dyn Clock, request_id: &str) -> Response {
        let envelope = self.envelope(clock, request_id);
        let mut response = (self.status, Json(envelope)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

/// Error response body (JSON). Every failure has exactly this shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details
    pub error: ErrorBody,
}

/// Inner object of [`ErrorEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// HTTP status code
    pub code: u16,
    /// Human-readable error message
    pub message: String,
    /// ISO-8601 time the response was produced
    pub timestamp: String,
    /// Client-supplied `x-request-id`, or `"unknown"`
    pub request_id: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // The envelope middleware rewrites the body with the request's id and
        // the injected clock; this body only matters without that middleware.
        self.report()
            .into_response_with(&SystemClock, UNKNOWN_REQUEST_ID)
    }
}

//! Fallback handler for unmatched routes.

use crate::error::AppError;
use axum::http::{Method, Uri};

/// Report a request that matched no route as a 404.
///
/// Install with `Router::fallback`. The error envelope middleware renders
/// and logs it like any other operational error.
pub async fn route_not_found(method: Method, uri: Uri) -> AppError {
    AppError::route_not_found(&method, uri.path())
}

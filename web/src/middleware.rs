//! Axum middleware for request tracking and the error contract.
//!
//! This module provides:
//! - **Request span**: every request runs inside an `http_request` span
//!   carrying its request id, method and URI; a client-supplied
//!   `x-request-id` is echoed on the response
//! - **Error envelope**: every 4xx/5xx response leaves the server as
//!   `{ "error": { code, message, timestamp, requestId } }` and is logged
//!   once with request context
//! - **Panic mapping**: a panicking handler becomes an internal error
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, middleware::from_fn_with_state};
//! use tower_http::catch_panic::CatchPanicLayer;
//! use ticket_trader_web::middleware::{error_envelope, panic_response, request_span_layer};
//!
//! let app = Router::new()
//!     .route("/health", get(health_check))
//!     .layer(CatchPanicLayer::custom(panic_response))
//!     .layer(from_fn_with_state(process.clone(), error_envelope))
//!     .layer(request_span_layer());
//! ```

use crate::error::{AppError, ErrorReport};
use crate::extractors::RequestId;
use crate::state::ProcessState;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use std::any::Any;
use std::task::{Context, Poll};
use ticket_trader_core::constants::REQUEST_ID_HEADER;
use tower::{Layer, Service};
use tracing::{Instrument, error, warn};

/// Create a layer that runs each request inside an `http_request` span.
#[must_use]
pub const fn request_span_layer() -> RequestSpanLayer {
    RequestSpanLayer
}

/// Layer for per-request tracing spans.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpanLayer;

impl<S> Layer<S> for RequestSpanLayer {
    type Service = RequestSpanMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequestSpanMiddleware { inner }
    }
}

/// Middleware service for per-request tracing spans.
#[derive(Clone, Debug)]
pub struct RequestSpanMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for RequestSpanMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let request_id = RequestId::from_headers(req.headers());

        let span = tracing::info_span!(
            "http_request",
            request_id = %request_id.as_str(),
            method = %req.method(),
            uri = %req.uri(),
        );

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Some(id) = request_id.0 {
                if let Ok(value) = HeaderValue::from_str(&id) {
                    response.headers_mut().insert(REQUEST_ID_HEADER, value);
                }
            }

            Ok(response)
        })
    }
}

/// Normalize and log every error response.
///
/// Responses built from an [`AppError`] carry an [`ErrorReport`]; the body is
/// rebuilt with the request's id and the injected clock, and the failure is
/// logged (`error` for internal failures, `warn` for operational ones).
/// Error responses produced by the framework itself (405, 413, extractor
/// rejections) are rewritten into the same envelope using the status's
/// canonical reason. Successful responses pass through untouched.
pub async fn error_envelope(
    State(process): State<ProcessState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let url = request.uri().to_string();
    let request_id = RequestId::from_headers(request.headers());

    let response = next.run(request).await;
    let status = response.status();

    let report = match response.extensions().get::<ErrorReport>() {
        Some(report) => report.clone(),
        None if status.is_client_error() || status.is_server_error() => {
            ErrorReport::from_status(status)
        }
        None => return response,
    };

    let timestamp = process.timestamp();
    if report.operational {
        warn!(
            status = report.status.as_u16(),
            method = %method,
            url = %url,
            request_id = %request_id.as_str(),
            timestamp = %timestamp,
            is_operational = true,
            "Error {}: {}",
            report.status.as_u16(),
            report.message,
        );
    } else {
        error!(
            status = report.status.as_u16(),
            method = %method,
            url = %url,
            request_id = %request_id.as_str(),
            timestamp = %timestamp,
            is_operational = false,
            detail = report.detail.as_deref().unwrap_or("-"),
            "Error {}: {}",
            report.status.as_u16(),
            report.message,
        );
    }

    // Keep headers set by inner layers (CORS, echoed request id, ...) and
    // replace only the body and its content headers.
    let (mut parts, _body) = response.into_parts();
    let (fresh, body) = report
        .into_response_with(process.clock(), request_id.as_str())
        .into_parts();
    parts.status = fresh.status;
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    parts.headers.extend(fresh.headers);
    parts.extensions.extend(fresh.extensions);

    Response::from_parts(parts, body)
}

/// Map a caught panic to an internal error response.
///
/// Intended for `tower_http::catch_panic::CatchPanicLayer::custom`.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    AppError::internal(anyhow::anyhow!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Method, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
    };
    use std::sync::Arc;
    use ticket_trader_core::constants::Environment;
    use ticket_trader_testing::{
        TEST_CLOCK_TIMESTAMP, assert_error_envelope, get as get_request, read_json, request,
        test_clock,
    };
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    fn app(router: Router<ProcessState>) -> Router {
        let process = ProcessState::new(Arc::new(test_clock()), Environment::Test);
        router
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(from_fn_with_state(process.clone(), error_envelope))
            .layer(request_span_layer())
            .with_state(process)
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let app = app(Router::new().route("/test", get(|| async { "ok" })));

        let response = app.oneshot(get_request("/test").unwrap()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(REQUEST_ID_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_request_id_echoed_and_used_in_envelope() {
        let app = app(Router::new().route(
            "/sold-out",
            get(|| async { Err::<(), _>(AppError::conflict("Ticket sold out")) }),
        ));

        let request = axum::http::Request::builder()
            .uri("/sold-out")
            .header(REQUEST_ID_HEADER, "req-7")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-7");

        let body = read_json(response).await.unwrap();
        assert_error_envelope(&body, 409, "Ticket sold out");
        assert_eq!(body["error"]["requestId"], "req-7");
        assert_eq!(body["error"]["timestamp"], TEST_CLOCK_TIMESTAMP);
    }

    #[tokio::test]
    async fn test_internal_error_is_masked() {
        let app = app(Router::new().route(
            "/boom",
            get(|| async {
                Err::<(), _>(AppError::internal(anyhow::anyhow!("pool exhausted")))
            }),
        ));

        let response = app.oneshot(get_request("/boom").unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_json(response).await.unwrap();
        assert_error_envelope(&body, 500, "Internal Server Error");
        assert_eq!(body["error"]["requestId"], "unknown");
        assert!(!body.to_string().contains("pool exhausted"));
    }

    #[tokio::test]
    async fn test_framework_error_rewritten() {
        let app = app(Router::new().route("/only-get", get(|| async { "ok" })));

        let response = app
            .oneshot(request(Method::DELETE, "/only-get").unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .unwrap(),
            "application/json"
        );

        let body = read_json(response).await.unwrap();
        assert_error_envelope(&body, 405, "Method Not Allowed");
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        async fn panicking() -> &'static str {
            panic!("invariant violated")
        }

        let app = app(Router::new().route("/panic", get(panicking)));

        let response = app.oneshot(get_request("/panic").unwrap()).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = read_json(response).await.unwrap();
        assert_error_envelope(&body, 500, "Internal Server Error");
    }

    #[test]
    fn test_panic_response_reports_payload() {
        let response = panic_response(Box::new("bad state"));
        let report = response.extensions().get::<ErrorReport>().unwrap();
        assert!(!report.operational);
        assert!(report.detail.as_deref().unwrap().contains("bad state"));
    }
}

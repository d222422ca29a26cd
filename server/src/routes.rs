//! Router configuration for the API server.
//!
//! Builds the complete Axum router with all endpoints and the middleware
//! stack shared by every route.

use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    middleware::from_fn_with_state,
    routing::get,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{AllowHeaders, AllowMethods, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use ticket_trader_web::handlers::{
    health::{api_info, health_check},
    not_found::route_not_found,
};
use ticket_trader_web::middleware::{error_envelope, panic_response, request_span_layer};

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Build the complete Axum router.
///
/// Configures:
/// - `GET /health` and `GET /api`
/// - the not-found fallback
/// - panic capture, the error envelope and the per-request span
/// - body limit, security headers, CORS, compression and access logging
///
/// Domain routers are merged into `routes` before the layers are applied so
/// they get the same error contract.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/health", get(health_check))
        .route("/api", get(api_info))
        .fallback(route_not_found);

    with_middleware(routes, state)
}

/// Apply the shared middleware stack to `routes` and attach `state`.
///
/// Innermost first: panic capture, error envelope, body limit, request span,
/// security headers, CORS, compression, access log.
pub fn with_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.server.cors_origin.clone())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    routes
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(from_fn_with_state(state.process.clone(), error_envelope))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(request_span_layer())
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

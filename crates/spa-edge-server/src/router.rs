//! HTTP router configuration.
//!
//! This module builds the Axum router with all routes and middleware.
//!
//! Routes, highest to lowest priority:
//! - `POST /telemetry` - Rate-limited telemetry intake
//! - `GET /assets/*` - Content-hashed build artifacts, cached immutably;
//!   a missing asset is a plain 404, never the SPA fallback
//! - anything else - The SPA fallback document, so a client-side router
//!   owns all other path semantics. This includes non-POST requests to
//!   `/telemetry`: only the POST method claims that path
//!
//! Cross-cutting policy is applied as tower layers: request tracing,
//! `X-Frame-Options: DENY` on every response, removal of any `Server`
//! banner, and gzip compression negotiated from `Accept-Encoding`.
//!
//! No Content-Security-Policy header is set. CSP enforcement is
//! deliberately disabled; enabling a real policy is a tracked hardening
//! follow-up, not part of the serving contract.

use axum::Router;
use axum::http::HeaderValue;
use axum::http::header;
use axum::middleware;
use axum::response::Response;
use axum::routing::post;
use tower_http::compression::CompressionLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::handler::{enforce_rate_limit, ingest_telemetry};
use crate::state::AppState;

/// Cache policy for `/assets` responses.
///
/// Safe only because the build pipeline bakes a content hash into every
/// asset filename: the bytes behind a given path never change.
pub const ASSET_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let assets = Router::new()
        .fallback_service(ServeDir::new(state.assets_dir()))
        .layer(middleware::map_response(asset_cache_control));

    Router::new()
        .route(
            "/telemetry",
            post(ingest_telemetry)
                // Only POST claims the path; any other method falls through
                // to the SPA document like every other unclaimed request,
                // without touching the rate limiter.
                .fallback_service(ServeFile::new(state.index_file()))
                .route_layer(middleware::from_fn_with_state(
                    state.clone(),
                    enforce_rate_limit,
                )),
        )
        .nest("/assets", assets)
        .fallback_service(ServeFile::new(state.index_file()))
        .layer(CompressionLayer::new())
        .layer(middleware::map_response(strip_server_header))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Mark successfully served assets as publicly cacheable and immutable.
async fn asset_cache_control(mut response: Response) -> Response {
    if response.status().is_success() {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(ASSET_CACHE_CONTROL),
        );
    }
    response
}

/// Drop any header advertising the server technology.
async fn strip_server_header(mut response: Response) -> Response {
    response.headers_mut().remove(header::SERVER);
    response
}

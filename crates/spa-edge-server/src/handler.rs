//! Request handlers for telemetry intake.
//!
//! The telemetry route is a short pipeline of two stages:
//!
//! 1. [`enforce_rate_limit`] — a route middleware that counts the request
//!    against the client address's window and short-circuits with 429 when
//!    over quota. It runs before the body is parsed, so a request that later
//!    fails JSON parsing has already consumed one unit of quota.
//! 2. [`ingest_telemetry`] — records the parsed payload and returns 204.
//!
//! A malformed JSON body is rejected by the `Json` extractor with a 4xx
//! before the handler body runs; nothing is logged for it.

use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

/// Route middleware enforcing the per-address telemetry quota.
///
/// Over-quota requests receive 429 with an empty body and are not logged;
/// the client is expected to back off. No Retry-After is sent.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    if state.limiter().check(peer.ip()).is_limited() {
        return StatusCode::TOO_MANY_REQUESTS.into_response();
    }

    next.run(request).await
}

/// Accept one telemetry event.
///
/// The payload is opaque JSON of any shape; it is never validated, only
/// wrapped in an envelope and appended to the configured log sinks. The
/// response is an unconditional 204 with an empty body.
pub async fn ingest_telemetry(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> StatusCode {
    let request_id = Uuid::new_v4().to_string();

    state.logger().record(&payload);

    info!(request_id = %request_id, "Telemetry event accepted");

    StatusCode::NO_CONTENT
}

//! Liveness endpoint.

use axum::http::StatusCode;

/// Liveness check.
///
/// Returns 200 OK while the process is serving requests. Dependencies
/// (database, broker) are not checked.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

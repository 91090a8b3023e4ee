use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::debug;

/// Tower-compatible middleware that stamps every response with an
/// `X-Response-Time-Us` header and emits one debug line per request.
pub async fn timing_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();

    let start = Instant::now();
    let mut response = next.run(req).await;
    let us = start.elapsed().as_micros() as u64;

    // ── Inject response header ──────────────────────────────────
    if let Ok(val) = us.to_string().parse() {
        response.headers_mut().insert("X-Response-Time-Us", val);
    }

    // ── Request log (skip the long-lived SSE route) ─────────────
    if !path.ends_with("/stream") {
        debug!(
            %method,
            path,
            status = response.status().as_u16(),
            us,
            "request"
        );
    }

    response
}

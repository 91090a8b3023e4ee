use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::handlers;
use crate::history::stream;
use crate::middleware::timing;
use crate::AppState;

/// Builds the full Axum `Router`: every JSON route plus middleware.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // ── Service status ──────────────────────────────────────
        .route("/", get(handlers::status::service_status))
        .route("/api/poller", get(handlers::status::poller_report))
        // ── Live cache ──────────────────────────────────────────
        .route("/api/current", get(stream::get_current))
        .route("/api/history", get(stream::get_history))
        .route("/api/history/stream", get(stream::history_stream))
        // ── Remote range queries ────────────────────────────────
        .route("/api/statistics", get(handlers::queries::statistics))
        .route("/api/raw", get(handlers::queries::raw))
        .route("/api/hourly", get(handlers::queries::hourly))
        .route("/api/daily", get(handlers::queries::daily))
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        // ── Global middleware (applied bottom-up) ───────────────
        .layer(axum_mw::from_fn(timing::timing_middleware))
        .layer(CorsLayer::permissive())
}

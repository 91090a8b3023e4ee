use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::poller::PollerReport;
use crate::AppState;

// ─── GET / ───────────────────────────────────────────────────────
/// Tiny liveness blob, handy for load balancers and curl.

pub async fn service_status(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "service": "tempwatch",
        "status": "running",
        "samples_cached": state.history.len(),
        "source": state.config.source_url,
    }))
}

// ─── GET /api/poller ─────────────────────────────────────────────
/// Poll-loop health: counters, last error, fetch-latency percentiles.

pub async fn poller_report(State(state): State<Arc<AppState>>) -> Json<PollerReport> {
    Json(state.poller_stats.report())
}

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::Sample;
use crate::AppState;

// ─── GET /api/current ────────────────────────────────────────────
/// The dashboard's headline number: the last polled reading plus the
/// moment we answered. Reads `0.0` until the first successful poll.

#[derive(Debug, Clone, Serialize)]
pub struct CurrentReading {
    pub temperature: f64,
    pub timestamp: String,
}

pub async fn get_current(State(state): State<Arc<AppState>>) -> Json<CurrentReading> {
    Json(CurrentReading {
        temperature: state.history.last_temperature(),
        timestamp: Local::now().to_rfc3339(),
    })
}

// ─── GET /api/history ────────────────────────────────────────────
/// Cached samples, oldest first. `?limit=` trims to the newest N;
/// anything unparseable means "no limit".

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<String>,
}

pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<Sample>> {
    let limit = params
        .limit
        .and_then(|raw| raw.trim().parse::<usize>().ok());
    let samples = match limit {
        Some(n) => state.history.most_recent(n),
        None => state.history.snapshot().samples,
    };
    Json(samples)
}

// ─── GET /api/history/stream ─────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes a full `HistorySnapshot` as JSON once per poll interval.
/// The browser's `EventSource` connects here and feeds the chart.

pub async fn history_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    // New data can only arrive once per poll, so tick at that rate
    let interval = tokio::time::interval(state.config.poll_interval);

    let stream = IntervalStream::new(interval).map(move |_| {
        let snapshot = state.history.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap_or_default();
        Ok(Event::default().data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

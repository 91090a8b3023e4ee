use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{Duration as ChronoDuration, Local};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

// ─── Constants ───────────────────────────────────────────────────

/// Random-walk sensor range (°C).
const MIN_TEMP: f64 = -10.0;
const MAX_TEMP: f64 = 30.0;
const START_TEMP: f64 = 20.0;

/// Largest change between consecutive readings.
const MAX_STEP: f64 = 0.5;

// ─── Mock sensor service ─────────────────────────────────────────

/// In-process stand-in for the remote temperature service: the same
/// routes and payload shapes, fed by a random walk. Used by the
/// `mock_source` binary and by the integration tests.
pub struct MockSource {
    walk: Mutex<Walk>,
}

struct Walk {
    rng: StdRng,
    temperature: f64,
}

impl MockSource {
    pub fn new() -> Self {
        Self::with_seed(42)
    }

    /// Deterministic variant so tests can rely on a fixed sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            walk: Mutex::new(Walk {
                rng: StdRng::seed_from_u64(seed),
                temperature: START_TEMP,
            }),
        }
    }

    /// One random-walk step, clamped to the sensor range.
    fn next_temperature(&self) -> f64 {
        let mut walk = self.walk.lock();
        let step = walk.rng.gen_range(-MAX_STEP..=MAX_STEP);
        walk.temperature = (walk.temperature + step).clamp(MIN_TEMP, MAX_TEMP);
        walk.temperature
    }

    fn jitter(&self, base: f64, spread: f64) -> f64 {
        let mut walk = self.walk.lock();
        base + walk.rng.gen_range(-spread..=spread)
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Router ──────────────────────────────────────────────────────

/// Routes matching the remote service contract.
pub fn router() -> Router {
    router_with(Arc::new(MockSource::new()))
}

pub fn router_with(source: Arc<MockSource>) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/api/current", get(current))
        .route("/api/statistics", get(statistics))
        .route("/api/raw", get(raw))
        .route("/api/hourly", get(hourly))
        .route("/api/daily", get(daily))
        .with_state(source)
}

// ─── Handlers ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RangeQuery {
    start: Option<String>,
    end: Option<String>,
    limit: Option<String>,
}

impl RangeQuery {
    fn has_range(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "running" }))
}

async fn current(State(source): State<Arc<MockSource>>) -> Json<Value> {
    Json(json!({ "temperature": round2(source.next_temperature()) }))
}

async fn statistics(
    State(source): State<Arc<MockSource>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Value>, StatusCode> {
    if !params.has_range() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let average = round2(source.jitter(START_TEMP, 2.0));
    Ok(Json(json!({
        "average": average,
        "min": round2(average - 4.0),
        "max": round2(average + 4.0),
        "samples": 1440,
    })))
}

async fn raw(
    State(source): State<Arc<MockSource>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Value>, StatusCode> {
    if !params.has_range() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let limit: usize = params
        .limit
        .as_deref()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(1000);
    // One day of minute-spaced samples at most
    let count = limit.min(1440);

    let now = Local::now();
    let readings: Vec<Value> = (0..count)
        .map(|i| {
            let ts = now - ChronoDuration::minutes((count - 1 - i) as i64);
            json!({
                "timestamp": ts.format("%Y-%m-%d %H:%M:%S").to_string(),
                "temperature": round2(source.jitter(START_TEMP, 3.0)),
            })
        })
        .collect();
    Ok(Json(Value::Array(readings)))
}

async fn hourly(
    State(source): State<Arc<MockSource>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Value>, StatusCode> {
    if !params.has_range() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let now = Local::now();
    let buckets: Vec<Value> = (0..24)
        .map(|i| {
            let ts = now - ChronoDuration::hours(23 - i);
            json!({
                "timestamp": ts.format("%Y-%m-%d %H:00:00").to_string(),
                "temperature": round2(source.jitter(START_TEMP, 2.0)),
            })
        })
        .collect();
    Ok(Json(Value::Array(buckets)))
}

async fn daily(
    State(source): State<Arc<MockSource>>,
    Query(params): Query<RangeQuery>,
) -> Result<Json<Value>, StatusCode> {
    if !params.has_range() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let now = Local::now();
    let buckets: Vec<Value> = (0..7)
        .map(|i| {
            let ts = now - ChronoDuration::days(6 - i);
            json!({
                "date": ts.format("%Y-%m-%d").to_string(),
                "temperature": round2(source.jitter(START_TEMP, 2.0)),
            })
        })
        .collect();
    Ok(Json(Value::Array(buckets)))
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

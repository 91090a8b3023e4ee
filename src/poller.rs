use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::SourceError;
use crate::history::ReadingHistory;
use crate::source::SourceClient;

// ─── Configuration ───────────────────────────────────────────────

/// HdrHistogram range for fetch latency: 1 μs → 60 s, 3 significant
/// figures.
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 60_000_000;
const HIST_SIGFIG: u8 = 3;

// ─── Poller ──────────────────────────────────────────────────────

/// The single background task that keeps `ReadingHistory` fresh.
/// One fetch per interval. A failed cycle is logged and skipped
/// without touching the cache or ending the loop.
pub struct Poller {
    source: SourceClient,
    history: Arc<ReadingHistory>,
    stats: Arc<PollerStats>,
    interval: Duration,
}

impl Poller {
    pub fn new(
        source: SourceClient,
        history: Arc<ReadingHistory>,
        stats: Arc<PollerStats>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            history,
            stats,
            interval,
        }
    }

    /// Poll until the shutdown channel fires. The first fetch runs
    /// immediately; afterwards the loop sleeps one interval per
    /// cycle and wakes early on shutdown.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(interval = ?self.interval, "poller started");
        loop {
            self.poll_once().await;
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => {
                    info!("poller shutting down");
                    break;
                }
            }
        }
    }

    async fn poll_once(&self) {
        let started = Instant::now();
        match self.source.fetch_current().await {
            Ok(temperature) => {
                let elapsed_us = started.elapsed().as_micros() as u64;
                self.history.append(temperature);
                self.stats.record_success(elapsed_us);
                debug!(temperature, elapsed_us, "poll ok");
            }
            Err(err) => {
                self.stats.record_failure(&err);
                warn!(kind = err.kind(), error = %err, "poll failed, keeping last reading");
            }
        }
    }
}

// ─── Poll statistics ─────────────────────────────────────────────

/// Shared counters plus a fetch-latency histogram. The poller
/// writes, `GET /api/poller` reads.
pub struct PollerStats {
    inner: Mutex<StatsInner>,
}

struct StatsInner {
    latency_hist: Histogram<u64>,
    polls_ok: u64,
    polls_failed: u64,
    last_error: Option<String>,
    last_success_at: Option<DateTime<Local>>,
}

/// Read-only view served to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct PollerReport {
    pub polls_ok: u64,
    pub polls_failed: u64,
    pub last_error: Option<String>,
    pub last_success_at: Option<String>,
    pub fetch_latency: LatencySummary,
}

/// Percentile breakdown of fetch latency (μs).
/// All zeroes until the first successful poll.
#[derive(Debug, Clone, Serialize)]
pub struct LatencySummary {
    pub count: u64,
    pub mean: f64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub max: u64,
}

impl LatencySummary {
    fn from_histogram(hist: &Histogram<u64>) -> Self {
        if hist.len() == 0 {
            return Self {
                count: 0,
                mean: 0.0,
                p50: 0,
                p95: 0,
                p99: 0,
                max: 0,
            };
        }
        Self {
            count: hist.len(),
            mean: hist.mean(),
            p50: hist.value_at_percentile(50.0),
            p95: hist.value_at_percentile(95.0),
            p99: hist.value_at_percentile(99.0),
            max: hist.max(),
        }
    }
}

impl PollerStats {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StatsInner {
                latency_hist: Histogram::<u64>::new_with_bounds(HIST_LOW, HIST_HIGH, HIST_SIGFIG)
                    .expect("histogram creation"),
                polls_ok: 0,
                polls_failed: 0,
                last_error: None,
                last_success_at: None,
            }),
        }
    }

    pub fn record_success(&self, latency_us: u64) {
        let mut inner = self.inner.lock();
        inner.polls_ok += 1;
        inner.last_success_at = Some(Local::now());
        // Clamp to the histogram floor of 1 μs
        let _ = inner.latency_hist.record(latency_us.max(1));
    }

    pub fn record_failure(&self, err: &SourceError) {
        let mut inner = self.inner.lock();
        inner.polls_failed += 1;
        inner.last_error = Some(format!("{err} ({})", err.kind()));
    }

    pub fn report(&self) -> PollerReport {
        let inner = self.inner.lock();
        PollerReport {
            polls_ok: inner.polls_ok,
            polls_failed: inner.polls_failed,
            last_error: inner.last_error.clone(),
            last_success_at: inner.last_success_at.map(|t| t.to_rfc3339()),
            fetch_latency: LatencySummary::from_histogram(&inner.latency_hist),
        }
    }
}

impl Default for PollerStats {
    fn default() -> Self {
        Self::new()
    }
}

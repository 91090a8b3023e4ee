use std::collections::VecDeque;

use chrono::{DateTime, Local};
use parking_lot::Mutex;
use serde::Serialize;

use super::Sample;

// ─── Public types ────────────────────────────────────────────────

/// Thread-safe bounded history of temperature readings.
/// The poller calls `append()`, readers call `snapshot()` or
/// `most_recent()`; a single mutex keeps the last-value register and
/// the sample buffer mutually consistent.
pub struct ReadingHistory {
    capacity: usize,
    inner: Mutex<Inner>,
}

/// Consistent copy of the whole cache, taken under one lock.
#[derive(Debug, Clone, Serialize)]
pub struct HistorySnapshot {
    pub last_temperature: f64,
    pub samples: Vec<Sample>,
}

// ─── Internal state ──────────────────────────────────────────────

struct Inner {
    samples: VecDeque<Sample>,
    last_temperature: f64,
}

// ─── ReadingHistory impl ─────────────────────────────────────────

impl ReadingHistory {
    /// `capacity` is the hard sample cap; once it is reached every
    /// append evicts the oldest reading.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            capacity,
            inner: Mutex::new(Inner {
                samples: VecDeque::with_capacity(capacity + 1),
                last_temperature: 0.0,
            }),
        }
    }

    /// Record a reading stamped "now".
    pub fn append(&self, temperature: f64) {
        self.record(Local::now(), temperature);
    }

    /// Record with an explicit capture time. Timestamps are kept
    /// monotonic: a backwards wall clock is clamped to the newest
    /// existing sample.
    fn record(&self, timestamp: DateTime<Local>, temperature: f64) {
        let mut inner = self.inner.lock();
        let timestamp = match inner.samples.back() {
            Some(newest) if timestamp < newest.timestamp => newest.timestamp,
            _ => timestamp,
        };
        inner.samples.push_back(Sample {
            timestamp,
            temperature,
        });
        if inner.samples.len() > self.capacity {
            inner.samples.pop_front();
        }
        inner.last_temperature = temperature;
    }

    /// One consistent copy of the register and every sample,
    /// oldest first.
    pub fn snapshot(&self) -> HistorySnapshot {
        let inner = self.inner.lock();
        HistorySnapshot {
            last_temperature: inner.last_temperature,
            samples: inner.samples.iter().cloned().collect(),
        }
    }

    /// Up to `n` newest samples, still oldest first.
    pub fn most_recent(&self, n: usize) -> Vec<Sample> {
        let inner = self.inner.lock();
        let skip = inner.samples.len().saturating_sub(n);
        inner.samples.iter().skip(skip).cloned().collect()
    }

    /// The last appended reading, `0.0` before the first append.
    pub fn last_temperature(&self) -> f64 {
        self.inner.lock().last_temperature
    }

    pub fn len(&self) -> usize {
        self.inner.lock().samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::error::SourceError;

// ─── Constants ───────────────────────────────────────────────────

/// Substituted whenever a caller-supplied `limit` is absent or not a
/// usable positive integer.
pub const DEFAULT_RAW_LIMIT: u32 = 100;

// ─── Range type ──────────────────────────────────────────────────

/// Bounds for a range query. Kept as opaque strings and forwarded
/// verbatim; the remote service owns range semantics, including
/// `start > end`. Statistics/raw take full timestamps
/// (`YYYY-MM-DD HH:MM:SS`), hourly/daily take dates (`YYYY-MM-DD`).
#[derive(Debug, Clone, Deserialize)]
pub struct TimeRange {
    pub start: String,
    pub end: String,
}

// ─── Gateway client ──────────────────────────────────────────────

/// Stateless gateway to the remote temperature service. One call is
/// one request with an explicit deadline, never retried.
/// Cheap to clone; every clone shares the underlying reqwest client.
#[derive(Debug, Clone)]
pub struct SourceClient {
    http: reqwest::Client,
    base_url: String,
    fetch_timeout: Duration,
    query_timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    temperature: f64,
}

impl SourceClient {
    pub fn new(
        base_url: &str,
        fetch_timeout: Duration,
        query_timeout: Duration,
    ) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(query_timeout)
            .build()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            fetch_timeout,
            query_timeout,
        })
    }

    /// GET `/api/current` → the `temperature` field.
    /// Runs under the shorter poll deadline; the poller calls this
    /// once per cycle.
    pub async fn fetch_current(&self) -> Result<f64, SourceError> {
        let url = format!("{}/api/current", self.base_url);
        let resp = self
            .http
            .get(&url)
            .timeout(self.fetch_timeout)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.fetch_timeout))?;
        let resp = Self::check_status(resp)?;
        let payload: CurrentPayload = resp
            .json()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.fetch_timeout))?;
        Ok(payload.temperature)
    }

    /// GET `/api/statistics?start&end` → aggregate object (the
    /// remote answers `{average, min, max, samples}`).
    pub async fn fetch_statistics(&self, range: &TimeRange) -> Result<Value, SourceError> {
        self.get_json(
            "/api/statistics",
            &[("start", range.start.as_str()), ("end", range.end.as_str())],
        )
        .await
    }

    /// GET `/api/raw?start&end&limit` → sequence of
    /// `{timestamp, temperature}` readings.
    pub async fn fetch_raw(&self, range: &TimeRange, limit: u32) -> Result<Value, SourceError> {
        let limit = limit.to_string();
        self.get_json(
            "/api/raw",
            &[
                ("start", range.start.as_str()),
                ("end", range.end.as_str()),
                ("limit", limit.as_str()),
            ],
        )
        .await
    }

    /// GET `/api/hourly?start&end` → hourly buckets.
    pub async fn fetch_hourly(&self, range: &TimeRange) -> Result<Value, SourceError> {
        self.get_json(
            "/api/hourly",
            &[("start", range.start.as_str()), ("end", range.end.as_str())],
        )
        .await
    }

    /// GET `/api/daily?start&end` → daily buckets.
    pub async fn fetch_daily(&self, range: &TimeRange) -> Result<Value, SourceError> {
        self.get_json(
            "/api/daily",
            &[("start", range.start.as_str()), ("end", range.end.as_str())],
        )
        .await
    }

    /// Shared GET → status check → opaque JSON body. The payload is
    /// forwarded without reshaping; the remote owns its schema.
    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, SourceError> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .timeout(self.query_timeout)
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.query_timeout))?;
        let resp = Self::check_status(resp)?;
        resp.json()
            .await
            .map_err(|e| SourceError::from_reqwest(e, self.query_timeout))
    }

    fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(SourceError::UpstreamStatus {
                status: resp.status().as_u16(),
            })
        }
    }
}

// ─── Limit coercion ──────────────────────────────────────────────

/// Coerce a caller-supplied limit into something usable: absent,
/// non-numeric, or non-positive input becomes `DEFAULT_RAW_LIMIT`.
pub fn coerce_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_RAW_LIMIT)
}

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::source::{coerce_limit, TimeRange};
use crate::AppState;

use super::ApiError;

// ─── Query parameters ────────────────────────────────────────────

/// Raw query-string inputs. `limit` stays a string until coercion so
/// garbage input degrades to the default instead of a 422.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: Option<String>,
    pub end: Option<String>,
    pub limit: Option<String>,
}

impl RangeParams {
    /// Both bounds are required; everything else about them is the
    /// remote service's business.
    fn require_range(self) -> Result<(TimeRange, Option<String>), ApiError> {
        let Self { start, end, limit } = self;
        match (start, end) {
            (Some(start), Some(end)) => Ok((TimeRange { start, end }, limit)),
            _ => Err(ApiError::BadRequest(
                "Missing start or end parameter".into(),
            )),
        }
    }
}

// ─── GET /api/statistics ─────────────────────────────────────────
/// Aggregate over a timestamp range, straight from the remote.

pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Value>, ApiError> {
    let (range, _) = params.require_range()?;
    let payload = state.source.fetch_statistics(&range).await?;
    Ok(Json(payload))
}

// ─── GET /api/raw ────────────────────────────────────────────────
/// Individual readings in a range. `limit` is coerced, never
/// rejected: a garbage value behaves exactly like the default.

pub async fn raw(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Value>, ApiError> {
    let (range, limit) = params.require_range()?;
    let limit = coerce_limit(limit.as_deref());
    let payload = state.source.fetch_raw(&range, limit).await?;
    Ok(Json(payload))
}

// ─── GET /api/hourly ─────────────────────────────────────────────
/// Hourly averages over a date range.

pub async fn hourly(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Value>, ApiError> {
    let (range, _) = params.require_range()?;
    let payload = state.source.fetch_hourly(&range).await?;
    Ok(Json(payload))
}

// ─── GET /api/daily ──────────────────────────────────────────────
/// Daily averages over a date range.

pub async fn daily(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> Result<Json<Value>, ApiError> {
    let (range, _) = params.require_range()?;
    let payload = state.source.fetch_daily(&range).await?;
    Ok(Json(payload))
}

pub mod queries;
pub mod status;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::SourceError;

// ─── Unified error type ──────────────────────────────────────────

/// Failures a route can answer with. Gateway errors keep their kind
/// slug so dashboard JS can branch without parsing messages.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Source(SourceError),
}

impl From<SourceError> for ApiError {
    fn from(err: SourceError) -> Self {
        Self::Source(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad-request", msg),
            Self::Source(err) => {
                let status = match err {
                    SourceError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, err.kind(), err.to_string())
            }
        };

        let body = serde_json::json!({
            "error":  message,
            "kind":   kind,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

use std::time::Duration;

use thiserror::Error;

// ─── Upstream failure taxonomy ───────────────────────────────────

/// Everything that can go wrong talking to the remote temperature
/// service. One variant per failure class so callers can branch on
/// `kind()` instead of string-matching messages.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection-level failure: refused, DNS, broken pipe.
    #[error("transport error: {0}")]
    Transport(String),

    /// The explicit per-request deadline elapsed.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The remote answered, but with a non-success HTTP status.
    #[error("upstream returned HTTP {status}")]
    UpstreamStatus { status: u16 },

    /// Body was not the JSON shape we expected.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl SourceError {
    /// Stable machine-readable slug, used in logs and failure JSON.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::Timeout(_) => "timeout",
            Self::UpstreamStatus { .. } => "upstream-error",
            Self::MalformedResponse(_) => "malformed-response",
        }
    }

    /// Fold a reqwest failure into the taxonomy. `deadline` is the
    /// timeout that was set on the request, echoed back when the
    /// failure is a timeout.
    pub(crate) fn from_reqwest(err: reqwest::Error, deadline: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(deadline)
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

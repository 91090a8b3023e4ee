//! Core of a temperature-monitoring dashboard: a background poller
//! samples a remote sensor service into a bounded in-memory history,
//! and a JSON API serves the live cache plus pass-through range
//! queries against the same remote.

pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod middleware;
pub mod mock_source;
pub mod poller;
pub mod server;
pub mod source;

use std::sync::Arc;

/// Shared application state available to every handler via
/// `State<Arc<AppState>>`.
pub struct AppState {
    /// Bounded live cache. The poller writes, handlers read.
    pub history: Arc<history::ReadingHistory>,

    /// Gateway for request-scoped remote queries.
    pub source: source::SourceClient,

    /// Poll-loop counters and latency histogram.
    pub poller_stats: Arc<poller::PollerStats>,

    /// Startup configuration (poll interval, source URL, ...).
    pub config: config::Config,
}

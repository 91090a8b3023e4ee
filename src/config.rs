use std::time::Duration;

use tracing::warn;

// ─── Defaults ────────────────────────────────────────────────────

const DEFAULT_SOURCE_URL: &str = "http://localhost:8080";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 2;
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 5;
const DEFAULT_HISTORY_CAPACITY: usize = 100;

// ─── Config ──────────────────────────────────────────────────────

/// Runtime configuration, read once at startup from `TEMPWATCH_*`
/// environment variables. Every field has a default; unparseable
/// values fall back to it rather than aborting startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote temperature service.
    pub source_url: String,

    /// Address the JSON API binds to.
    pub listen_addr: String,

    /// Cadence of the background poll loop.
    pub poll_interval: Duration,

    /// Deadline for the current-value fetch. Kept strictly below the
    /// poll interval so a hung fetch can never eat the next cycle.
    pub fetch_timeout: Duration,

    /// Deadline for request-scoped range queries.
    pub query_timeout: Duration,

    /// Maximum number of samples kept in the live history.
    pub history_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Core loader, parameterized over the variable source so tests
    /// don't have to mutate process-global environment state.
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_url = lookup("TEMPWATCH_SOURCE_URL")
            .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());
        let listen_addr = lookup("TEMPWATCH_LISTEN_ADDR")
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());

        let poll_secs = parse_var(
            &lookup,
            "TEMPWATCH_POLL_INTERVAL_SECS",
            DEFAULT_POLL_INTERVAL_SECS,
        )
        .max(1);
        let fetch_secs = parse_var(
            &lookup,
            "TEMPWATCH_FETCH_TIMEOUT_SECS",
            DEFAULT_FETCH_TIMEOUT_SECS,
        )
        .max(1);
        let query_secs = parse_var(
            &lookup,
            "TEMPWATCH_QUERY_TIMEOUT_SECS",
            DEFAULT_QUERY_TIMEOUT_SECS,
        )
        .max(1);
        let history_capacity =
            parse_var(&lookup, "TEMPWATCH_HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY).max(1);

        let poll_interval = Duration::from_secs(poll_secs);
        let mut fetch_timeout = Duration::from_secs(fetch_secs);

        // The poll loop runs fetch and sleep sequentially in one
        // task; the fetch deadline must stay below the interval.
        if fetch_timeout >= poll_interval {
            let clamped = poll_interval / 2;
            warn!(
                requested = ?fetch_timeout,
                interval = ?poll_interval,
                clamped = ?clamped,
                "fetch timeout must stay below the poll interval, clamping"
            );
            fetch_timeout = clamped;
        }

        Self {
            source_url,
            listen_addr,
            poll_interval,
            fetch_timeout,
            query_timeout: Duration::from_secs(query_secs),
            history_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

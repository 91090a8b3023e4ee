use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tempwatch::config::Config;
use tempwatch::history::ReadingHistory;
use tempwatch::poller::{Poller, PollerStats};
use tempwatch::source::SourceClient;
use tempwatch::{server, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tempwatch=debug")),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════╗");
    println!("║   🌡  TEMPWATCH · LIVE TEMPERATURE DASHBOARD     ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();

    // ── 1. Load configuration ────────────────────────────────────
    let config = Config::from_env();
    info!(
        source = %config.source_url,
        interval = ?config.poll_interval,
        capacity = config.history_capacity,
        "configuration loaded"
    );

    // ── 2. Build the gateway client ──────────────────────────────
    let source = SourceClient::new(
        &config.source_url,
        config.fetch_timeout,
        config.query_timeout,
    )
    .expect("Failed to build the upstream HTTP client");

    // ── 3. Spawn the background poller ───────────────────────────
    let history = Arc::new(ReadingHistory::new(config.history_capacity));
    let poller_stats = Arc::new(PollerStats::new());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let poller = Poller::new(
        source.clone(),
        history.clone(),
        poller_stats.clone(),
        config.poll_interval,
    );
    let poller_handle = tokio::spawn(poller.run(shutdown_rx));

    // ── 4. Build shared state & router ───────────────────────────
    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState {
        history,
        source,
        poller_stats,
        config,
    });
    let app = server::create_router(state);

    // ── 5. Bind & serve until ctrl-c ─────────────────────────────
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .expect("Failed to bind listen address, is it already in use?");

    println!("Server listening on http://{listen_addr}");
    println!("Current reading → http://{listen_addr}/api/current");
    println!("History JSON    → http://{listen_addr}/api/history");
    println!("Live SSE        → http://{listen_addr}/api/history/stream");
    println!("Poller health   → http://{listen_addr}/api/poller");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("ctrl-c received, shutting down"),
                Err(e) => error!(error = %e, "failed to listen for ctrl-c"),
            }
            let _ = shutdown_tx.send(true);
        })
        .await
        .expect("Server exited with error");

    // The poller sees the same shutdown signal; wait for it to wind
    // down before the process exits.
    let _ = poller_handle.await;
    info!("shutdown complete");
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use tower::ServiceExt;

use tempwatch::config::Config;
use tempwatch::history::ReadingHistory;
use tempwatch::poller::PollerStats;
use tempwatch::source::SourceClient;
use tempwatch::{mock_source, server, AppState};

// ─── Helpers ─────────────────────────────────────────────────────

fn test_config(source_url: &str) -> Config {
    Config {
        source_url: source_url.to_string(),
        listen_addr: "127.0.0.1:0".into(),
        poll_interval: Duration::from_millis(50),
        fetch_timeout: Duration::from_millis(200),
        query_timeout: Duration::from_millis(200),
        history_capacity: 100,
    }
}

/// Router plus a handle on its state so tests can seed the cache.
fn build_app(source_url: &str) -> (Router, Arc<AppState>) {
    let config = test_config(source_url);
    let source = SourceClient::new(
        &config.source_url,
        config.fetch_timeout,
        config.query_timeout,
    )
    .unwrap();
    let state = Arc::new(AppState {
        history: Arc::new(ReadingHistory::new(config.history_capacity)),
        source,
        poller_stats: Arc::new(PollerStats::new()),
        config,
    });
    (server::create_router(state.clone()), state)
}

async fn serve_upstream(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

// ─── Cache-backed routes ─────────────────────────────────────────

#[tokio::test]
async fn root_reports_a_running_service() {
    let (app, _) = build_app("http://127.0.0.1:1");
    let (status, body) = get_json(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "tempwatch");
    assert_eq!(body["status"], "running");
}

#[tokio::test]
async fn current_reads_zero_before_the_first_poll() {
    let (app, _) = build_app("http://127.0.0.1:1");
    let (status, body) = get_json(&app, "/api/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["temperature"], 0.0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn current_reflects_the_newest_sample() {
    let (app, state) = build_app("http://127.0.0.1:1");
    state.history.append(22.5);
    let (status, body) = get_json(&app, "/api/current").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["temperature"], 22.5);
}

#[tokio::test]
async fn history_serves_samples_oldest_first() {
    let (app, state) = build_app("http://127.0.0.1:1");
    for t in [1.0, 2.0, 3.0] {
        state.history.append(t);
    }
    let (status, body) = get_json(&app, "/api/history").await;
    assert_eq!(status, StatusCode::OK);
    let temps: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["temperature"].as_f64().unwrap())
        .collect();
    assert_eq!(temps, vec![1.0, 2.0, 3.0]);
    // Entries use the dashboard feed shape
    assert_eq!(body[0]["timestamp"].as_str().unwrap().len(), 8);
}

#[tokio::test]
async fn history_limit_trims_to_the_newest_samples() {
    let (app, state) = build_app("http://127.0.0.1:1");
    for t in [1.0, 2.0, 3.0, 4.0, 5.0] {
        state.history.append(t);
    }
    let (_, body) = get_json(&app, "/api/history?limit=2").await;
    let temps: Vec<f64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["temperature"].as_f64().unwrap())
        .collect();
    assert_eq!(temps, vec![4.0, 5.0]);

    // A garbage limit means "no limit"
    let (_, body) = get_json(&app, "/api/history?limit=all").await;
    assert_eq!(body.as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn responses_carry_the_timing_header() {
    let (app, _) = build_app("http://127.0.0.1:1");
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/current")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert!(response.headers().contains_key("X-Response-Time-Us"));
}

// ─── Pass-through query routes ───────────────────────────────────

#[tokio::test]
async fn statistics_requires_both_bounds() {
    // Upstream is a closed port: a 400 here proves no remote call
    // was attempted (a call would surface as a 502)
    let (app, _) = build_app("http://127.0.0.1:1");
    let (status, body) = get_json(&app, "/api/statistics?start=2026-08-21%2000:00:00").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing start or end parameter");
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn statistics_passes_the_upstream_payload_through() {
    let addr = serve_upstream(mock_source::router()).await;
    let (app, _) = build_app(&format!("http://{addr}"));
    let (status, body) =
        get_json(&app, "/api/statistics?start=2026-08-21%2000:00:00&end=2026-08-22%2000:00:00")
            .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["average"].is_f64());
    assert!(body["min"].is_f64());
    assert!(body["max"].is_f64());
    assert_eq!(body["samples"], 1440);
}

#[tokio::test]
async fn raw_coerces_a_garbage_limit_to_the_default() {
    // Echo upstream: answers with the query params it received
    let echo = Router::new().route(
        "/api/raw",
        get(
            |axum::extract::Query(params): axum::extract::Query<
                std::collections::HashMap<String, String>,
            >| async move { Json(serde_json::json!({ "limit": params.get("limit") })) },
        ),
    );
    let addr = serve_upstream(echo).await;
    let (app, _) = build_app(&format!("http://{addr}"));

    let (status, body) =
        get_json(&app, "/api/raw?start=a&end=b&limit=banana").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["limit"], "100");

    // Identical to asking for limit=100 explicitly
    let (_, explicit) = get_json(&app, "/api/raw?start=a&end=b&limit=100").await;
    assert_eq!(body, explicit);

    // A usable limit passes through unchanged
    let (_, body) = get_json(&app, "/api/raw?start=a&end=b&limit=20").await;
    assert_eq!(body["limit"], "20");
}

#[tokio::test]
async fn raw_serves_readings_from_the_mock_source() {
    let addr = serve_upstream(mock_source::router()).await;
    let (app, _) = build_app(&format!("http://{addr}"));
    let (status, body) =
        get_json(&app, "/api/raw?start=2026-08-21%2000:00:00&end=2026-08-22%2000:00:00&limit=15")
            .await;
    assert_eq!(status, StatusCode::OK);
    let readings = body.as_array().unwrap();
    assert_eq!(readings.len(), 15);
    assert!(readings[0]["timestamp"].is_string());
    assert!(readings[0]["temperature"].is_number());
}

#[tokio::test]
async fn hourly_and_daily_pass_through() {
    let addr = serve_upstream(mock_source::router()).await;
    let (app, _) = build_app(&format!("http://{addr}"));

    let (status, body) =
        get_json(&app, "/api/hourly?start=2026-08-21&end=2026-08-22").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 24);

    let (status, body) = get_json(&app, "/api/daily?start=2026-08-15&end=2026-08-22").await;
    assert_eq!(status, StatusCode::OK);
    let buckets = body.as_array().unwrap();
    assert_eq!(buckets.len(), 7);
    assert!(buckets[0]["date"].is_string());
}

#[tokio::test]
async fn upstream_500_surfaces_as_a_502_with_its_kind() {
    let failing = Router::new().route(
        "/api/statistics",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let addr = serve_upstream(failing).await;
    let (app, _) = build_app(&format!("http://{addr}"));

    let (status, body) = get_json(&app, "/api/statistics?start=a&end=b").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "upstream-error");
    assert_eq!(body["status"], 502);
}

#[tokio::test]
async fn unreachable_upstream_surfaces_as_a_transport_failure() {
    let (app, _) = build_app("http://127.0.0.1:1");
    let (status, body) = get_json(&app, "/api/daily?start=a&end=b").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "transport");
}

#[tokio::test]
async fn poller_route_reports_zeroed_stats_at_startup() {
    let (app, _) = build_app("http://127.0.0.1:1");
    let (status, body) = get_json(&app, "/api/poller").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["polls_ok"], 0);
    assert_eq!(body["polls_failed"], 0);
    assert_eq!(body["fetch_latency"]["count"], 0);
}

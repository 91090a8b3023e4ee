use tempwatch::mock_source;

#[tokio::main]
async fn main() {
    let addr =
        std::env::var("TEMPWATCH_MOCK_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    println!();
    println!("🌡  Mock temperature service");
    println!("   Current reading → http://{addr}/api/current");
    println!("   Range queries   → /api/statistics /api/raw /api/hourly /api/daily");
    println!();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind mock source address");

    axum::serve(listener, mock_source::router())
        .await
        .expect("Mock source exited with error");
}

#[tokio::main]
async fn main() {
    houndwear_observability::init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
        tracing::warn!("BIND_ADDR not set; defaulting to 0.0.0.0:8080");
        "0.0.0.0:8080".to_string()
    });

    let app = houndwear_api::app::build_app().await;

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind listen address");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}

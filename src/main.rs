use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use save_my_wines::{
    app_state::AppState,
    config::AppConfig,
    db, routes,
    services::{storage::S3ObjectStore, vision::GoogleVisionClient},
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing save-my-wines server");

    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);
    routes::metrics::describe_metrics();

    tracing::info!("Connecting to PostgreSQL database");
    let db_pool = db::init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Running database migrations");
    db::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!(bucket = %config.storage_bucket, "Initializing object storage client");
    let storage = S3ObjectStore::new(
        &config.storage_bucket,
        &config.storage_region,
        &config.storage_endpoint,
        &config.storage_access_key,
        &config.storage_secret_key,
        &config.storage_public_url,
    )
    .expect("Failed to initialize object storage client");

    tracing::info!(
        timeout_secs = config.vision_timeout_secs,
        "Initializing Cloud Vision client"
    );
    let vision = GoogleVisionClient::new(
        &config.vision_endpoint,
        &config.vision_api_key,
        config.vision_timeout(),
        config.vision_max_labels,
    )
    .expect("Failed to initialize Cloud Vision client");

    let state = AppState::new(db_pool, Arc::new(storage), Arc::new(vision));

    let app = routes::router(state, config.max_upload_bytes).route(
        "/metrics",
        get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}

use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    serve, Router,
};
use fieldmark_utils::{init_logging, AppConfig, SheetParser};
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

mod handlers;
mod metrics;
mod middleware;
mod routes;

use handlers::{health_check, metrics_handler, upload_fields};
use metrics::Metrics;
use middleware::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });

    // Initialize logging
    init_logging(&config.logging)?;
    info!("Starting Fieldmark API Gateway");

    let app = create_app(&config)?;

    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    info!("API Gateway listening on {}", listener.local_addr()?);

    serve(listener, app).await?;

    Ok(())
}

fn create_app(config: &AppConfig) -> Result<Router> {
    let parser = SheetParser::new().with_delimiter(config.upload.delimiter_byte()?);
    let metrics = Metrics::new()?;

    let app = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/upload", post(upload_fields))

        // API routes
        .nest("/api/v1", routes::create_api_routes())

        // Middleware stack
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(error_handling_middleware))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(config.server.timeout_seconds)))
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                )
                .layer(DefaultBodyLimit::max(config.server.max_request_size)),
        )

        // Application state
        .with_state(AppState {
            config: config.clone(),
            parser,
            metrics,
        });

    Ok(app)
}

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub parser: SheetParser,
    pub metrics: Metrics,
}

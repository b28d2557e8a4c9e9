mod analysis;
mod config;
mod crypto;
mod db;
mod db_storage;
mod errors;
mod extract;
mod handlers;
mod metrics;
mod models;
mod report;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::analysis::{AiClient, RiskAnalyzer};
use crate::config::Config;
use crate::crypto::FieldCipher;
use crate::db::Database;

/// Main entry point for the application.
///
/// Initializes logging, configuration, the database, the encryption-at-rest
/// cipher and the optional AI client, then starts the Axum server.
///
/// # Returns
///
/// * `anyhow::Result<()>` - Ok if the server runs successfully, or an error if initialization fails.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "finhealth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!("Configuration loaded successfully");

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Resolve the encryption-at-rest key; fails fast for a persistent
    // database with no configured key.
    let cipher = Arc::new(FieldCipher::new(&config.resolve_cipher_key()?));
    tracing::info!("Field encryption initialized");

    // Initialize the AI client; without a credential every analysis takes
    // the simulated fallback path.
    let ai_client = match &config.openai_api_key {
        Some(key) => {
            tracing::info!("✓ AI client initialized: {}", config.ai_base_url);
            Some(AiClient::new(
                config.ai_base_url.clone(),
                key.clone(),
                config.ai_model.clone(),
            ))
        }
        None => {
            tracing::warn!("OPENAI_API_KEY not set; analyses will use the simulated fallback");
            None
        }
    };

    // Build application state
    let app_state = Arc::new(handlers::AppState {
        db: db.pool.clone(),
        config: config.clone(),
        analyzer: RiskAnalyzer::new(ai_client),
        cipher,
    });

    // Configure rate limiter: 10 requests/second per IP, burst of 20
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(10)
            .burst_size(20)
            .key_extractor(SmartIpKeyExtractor)
            .finish()
            .unwrap(),
    );

    // Build protected routes with security layers
    let protected_routes = Router::new()
        .route("/api/v1/analyze", post(handlers::analyze))
        .layer(
            ServiceBuilder::new()
                // Request size limit: 5MB max upload (prevents memory exhaustion)
                .layer(RequestBodyLimitLayer::new(5 * 1024 * 1024))
                .layer(DefaultBodyLimit::max(5 * 1024 * 1024))
                // Rate limiting: 10 req/sec per IP, burst of 20
                .layer(GovernorLayer {
                    config: governor_conf,
                }),
        );

    // Build final app with health check (bypasses rate limiting)
    let app = Router::new()
        .route("/health", get(handlers::health))
        .merge(protected_routes)
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

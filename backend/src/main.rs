//! Paddy Yield Advisory Platform - Backend Server
//!
//! Serves a pretrained agronomic prediction model for paddy cultivation:
//! numeric recommendations, categorical advisory text and fertilizer dosage,
//! with per-user prediction history.

use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod artifacts;
mod config;
mod error;
mod handlers;
mod middleware;
mod routes;
mod services;

pub use config::Config;

use artifacts::ArtifactStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: Arc<Config>,
    /// Model artifacts, loaded once at startup and never mutated
    pub artifacts: Arc<ArtifactStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paddy_server=debug,tower_http=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Paddy Yield Advisory Server");
    tracing::info!("Environment: {}", config.environment);

    // Load model artifacts before accepting any traffic. A failure here is
    // fatal: the service must not start with missing or corrupt artifacts.
    tracing::info!("Loading model artifacts from {}", config.model.dir);
    let artifacts = ArtifactStore::load(std::path::Path::new(&config.model.dir))?;
    tracing::info!(
        "Artifacts loaded: {} regression trees, {} advisory targets",
        artifacts.numeric.tree_count(),
        artifacts.encoders.target_count()
    );

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database.url)
        .await?;

    tracing::info!("Database connection established");

    // Run migrations in development
    if config.environment == "development" {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&db_pool).await?;
        tracing::info!("Migrations completed");
    }

    // Create application state
    let state = AppState {
        db: db_pool,
        config: Arc::new(config.clone()),
        artifacts: Arc::new(artifacts),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::new(host, config.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", routes::api_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "Paddy Yield Advisory Platform API v1.0"
}

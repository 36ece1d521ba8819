pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use recall_core::{get_algorithm, SpacedRepetitionAlgorithm};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub scheduler: Arc<dyn SpacedRepetitionAlgorithm>,
}

impl AppState {
    /// Build state with the scheduler named in `scheduler`.
    pub fn new(db: Database, scheduler: &str) -> anyhow::Result<Self> {
        let scheduler = get_algorithm(scheduler)
            .ok_or_else(|| anyhow!("Unknown scheduler: {}", scheduler))?;

        Ok(Self {
            db: Arc::new(db),
            scheduler: Arc::from(scheduler),
        })
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url, config.max_connections).await?;

    tracing::info!("Running migrations...");
    db.run_migrations().await?;

    let state = AppState::new(db, &config.scheduler)?;
    tracing::info!("Using {} scheduler", state.scheduler.name());

    let app = router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Learner routes
        .route("/api/learners/me", get(routes::learner::me))
        // Flashcard routes
        .route(
            "/api/flashcards",
            get(routes::flashcards::list).post(routes::flashcards::create),
        )
        // Review routes
        .route(
            "/api/flashcards/review",
            get(routes::review::due).post(routes::review::submit),
        )
        .route("/api/flashcards/stats", get(routes::review::stats))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/learners/register", post(routes::learner::register))
        .merge(protected_routes)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

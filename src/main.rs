use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod service;

use crate::config::Config;
use crate::db::{BookRepository, MemoryBookRepository, PgBookRepository};
use crate::service::BookService;

/// Shared application state, cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub books: BookService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present (ignored in production where env vars are injected)
    dotenv::dotenv().ok();

    // Structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,book_service=debug")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;

    let repository: Arc<dyn BookRepository> = match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL...");
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(url)
                .await?;
            info!("Database connection pool established.");

            info!("Running migrations...");
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Migrations complete.");

            Arc::new(PgBookRepository::new(pool))
        }
        None => {
            warn!("DATABASE_URL not set; books are kept in memory and lost on exit");
            Arc::new(MemoryBookRepository::new())
        }
    };

    let state = AppState {
        books: BookService::new(repository),
    };

    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    Router::new()
        // ── Health ──────────────────────────────────────────────────────────
        .route("/health", get(handlers::health))

        // ── Books ───────────────────────────────────────────────────────────
        .route("/api/add", post(handlers::books::add_book))
        .route("/api/update", post(handlers::books::update_book))
        .route("/api/getAll", get(handlers::books::get_all_books))
        .route("/api/get/:bookid", get(handlers::books::get_book))
        .route("/api/delete/:bookid", post(handlers::books::delete_book))

        // ── Middleware ──────────────────────────────────────────────────────
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod testing;
pub mod validation;

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, MemoryPostStore, PgPostStore, PostStore};
use crate::state::AppState;

/// Build the HTTP application around the given state
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Posts (create requires a bearer token)
        .merge(post_routes())
        .layer(DefaultBodyLimit::max(state.max_request_size_bytes));

    let router = if state.enable_cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(handlers::posts_list).post(handlers::post_create))
        .route("/posts/:id", get(handlers::post_get))
}

/// Pick the post store: PostgreSQL from `DATABASE_URL`, or process memory
pub async fn build_store(config: &AppConfig, memory: bool) -> anyhow::Result<Arc<dyn PostStore>> {
    if memory {
        tracing::warn!("Using in-memory post store; data is lost on exit");
        return Ok(Arc::new(MemoryPostStore::new()));
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    Ok(Arc::new(PgPostStore::new(pool)))
}

/// Bind and serve until the process is stopped
pub async fn serve(config: AppConfig, memory: bool) -> anyhow::Result<()> {
    let store = build_store(&config, memory).await?;
    let state = AppState::from_config(&config, store);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Blog API listening on http://{} ({:?})", bind_addr, config.environment);

    axum::serve(listener, app(state)).await?;
    Ok(())
}

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use study_rag_backend::config::AppConfig;
use study_rag_backend::routes::{chat, config as config_routes, documents, health, history};
use study_rag_backend::services::snapshot::SnapshotStore;
use study_rag_backend::services::storage::StorageService;
use study_rag_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    tracing::info!(
        "Configuration loaded (env: {})",
        std::env::var("RUN_ENV").unwrap_or_else(|_| "development".into())
    );

    let storage = Arc::new(
        StorageService::new(&config.storage)
            .await
            .context("Failed to initialize object storage")?,
    );

    let store = SnapshotStore::new(storage.clone())
        .load()
        .await
        .context("Failed to restore state snapshot")?;
    tracing::info!(
        "Restored {} document(s), {} indexed chunk(s), {} conversation(s)",
        store.documents.len(),
        store.index.len(),
        store.history.len()
    );

    let state = AppState::new(config.clone(), storage, store);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/chat", post(chat::chat))
        .route(
            "/api/documents",
            get(documents::list).post(documents::upload),
        )
        .route("/api/clear_index", post(documents::clear_index))
        .route("/api/history", get(history::list))
        .route(
            "/api/config",
            get(config_routes::get_config).post(config_routes::update_config),
        );

    let app = api
        .fallback_service(ServeDir::new("static"))
        .layer(DefaultBodyLimit::max(documents::MAX_FILE_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .await
        .context("Server error")?;

    Ok(())
}

//! Relish API server implementation
//!
//! HTTP server using Axum. Serves the grid store endpoints, the
//! `=AI()` generate endpoint, and optionally a directory of static demo
//! UI assets.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::ai::FormulaProxy;
use crate::store::ReviewStore;

use super::handlers;

/// API server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Static demo UI directory mounted at `/` when set.
    pub assets_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            assets_dir: None,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub store: ReviewStore,
    pub proxy: FormulaProxy,
    pub version: String,
    pub started_at: DateTime<Utc>,
}

/// Build the router over `state`.
///
/// Split out from [`run_api_server`] so tests can drive the full stack
/// in-process without binding a socket.
pub fn build_router(state: Arc<AppState>, assets_dir: Option<&Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health and info endpoints
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Grid store endpoints
        .route("/api/reviews", get(handlers::list_reviews))
        .route("/api/review/create", post(handlers::create_reviews))
        .route("/api/review/update", post(handlers::update_reviews))
        .route("/api/review/delete", post(handlers::delete_reviews))
        // =AI() formula endpoint
        .route("/api/generate", post(handlers::generate));

    // The demo UI (when present) owns the root; otherwise an API index.
    let router = match assets_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router.route("/", get(handlers::root)),
    };

    router
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relish=info,tower_http=info".into()),
        )
        .init();

    let app = build_router(Arc::clone(&state), config.assets_dir.as_deref());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("🍽️  Relish review grid server starting on http://{}", addr);
    info!("   Store: /api/reviews, /api/review/create, /api/review/update, /api/review/delete");
    info!("   Formula: POST /api/generate");
    if let Some(dir) = &config.assets_dir {
        info!("   Demo UI: serving {} at /", dir.display());
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Relish server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}

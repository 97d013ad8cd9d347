//! Axum HTTP server

use super::config::ServerConfig;
use super::handlers::{health, index, upload};
use super::retention;
use crate::error::{Result, WaveError};
use crate::pipeline::Pipeline;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pipeline: Arc<Pipeline>,
}

impl AppState {
    /// Build the pipeline, create the upload/static directories and prune them
    pub fn new(config: ServerConfig) -> Result<Self> {
        config.prepare_dirs()?;
        retention::enforce(&config, None, None)?;
        let pipeline = Pipeline::new(config.analyzer.clone(), config.figure.clone())?;

        Ok(Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
        })
    }
}

/// Build the router
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let body_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/", get(index).post(upload))
        .route("/health", get(health))
        .nest_service("/static", static_files)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Web server for the upload page
pub struct WebServer {
    state: AppState,
}

impl WebServer {
    /// Create a new web server; directories are created here, once
    pub fn new(config: ServerConfig) -> Result<Self> {
        Ok(Self {
            state: AppState::new(config)?,
        })
    }

    /// Run until Ctrl-C
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.socket_addr()?;
        let app = build_router(self.state);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(WaveError::Io)?;

        tracing::info!("Web server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        // Without a signal handler, keep serving
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn state(root: &std::path::Path) -> AppState {
        let config = ServerConfig::default()
            .with_upload_dir(root.join("uploads"))
            .with_static_dir(root.join("static"));
        AppState::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_state_creates_dirs() {
        let root = tempfile::tempdir().unwrap();
        let _state = state(root.path());

        assert!(root.path().join("uploads").is_dir());
        assert!(root.path().join("static").is_dir());
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let root = tempfile::tempdir().unwrap();
        let app = build_router(state(root.path()));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health() {
        let root = tempfile::tempdir().unwrap();
        let app = build_router(state(root.path()));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}

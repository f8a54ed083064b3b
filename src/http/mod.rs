//! HTTP API
//!
//! - `GET  /health`
//! - `POST /api/v1/pdf/split`: ZIP of single-page PDFs
//! - `POST /api/v1/pdf/info`: JSON page count and size
//! - `POST /api/v1/pdf/compress`: optimized PDF
//! - `POST /api/v1/pdf/remove-pages`: PDF without the removed pages
//!
//! Errors are JSON bodies `{"success": false, "error": ..., "code": ...}`.

mod error;
mod handlers;

pub use error::{ApiError, ErrorResponse};

use crate::config::{HttpConfig, PdfConfig};
use crate::processor::Processor;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<Processor>,
}

impl AppState {
    pub fn new(pdf: PdfConfig) -> Self {
        Self {
            processor: Arc::new(Processor::with_config(pdf)),
        }
    }
}

/// Build the router with body limit, timeout and request tracing applied.
pub fn router(state: AppState, config: &HttpConfig) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/pdf/split", post(handlers::split))
        .route("/api/v1/pdf/info", post(handlers::info))
        .route("/api/v1/pdf/compress", post(handlers::compress))
        .route("/api/v1/pdf/remove-pages", post(handlers::remove_pages))
        .layer(DefaultBodyLimit::max(config.max_upload_size))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until Ctrl-C.
pub async fn serve(pdf: PdfConfig, config: HttpConfig) -> anyhow::Result<()> {
    let app = router(AppState::new(pdf), &config);
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        addr = %listener.local_addr()?,
        max_upload_size = config.max_upload_size,
        timeout_secs = config.request_timeout.as_secs(),
        "HTTP server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

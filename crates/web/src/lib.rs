use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use portfolio_health_core::PortfolioHealth;
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod pages;

/// Default request body cap: 50 MB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// The shared application state that all handlers can access.
///
/// Read-only: every request is analysed from its own upload and nothing
/// is kept between requests.
pub struct AppState {
    pub health: PortfolioHealth,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(health: PortfolioHealth) -> Self {
        Self {
            health,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_upload_bytes(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze))
        .route("/report", post(handlers::report))
        .route("/api/analysis", post(handlers::api_analysis))
        .route("/api/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// Bind `addr` and serve until the process is stopped.
///
/// Tracing must already be initialised by the caller.
pub async fn run_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

//! REST API over a finished run.
//!
//! Provides four GET endpoints:
//! - `/summary` — configuration and run summary
//! - `/series` — per-minute energy rows with optional range filtering
//! - `/events` — toggle events including the opening and closing markers
//! - `/annotations` — rate-limited chart annotations

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::run::SimulationRun;
use crate::sim::summary::RunSummary;

/// Immutable application state shared across all request handlers.
///
/// Built once after the run completes; all data is read-only.
pub struct AppState {
    /// The recorded run.
    pub run: SimulationRun,
    /// Summary computed from `run`.
    pub summary: RunSummary,
}

impl AppState {
    pub fn new(run: SimulationRun) -> Self {
        let summary = RunSummary::from_run(&run);
        Self { run, summary }
    }
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route("/series", get(handlers::get_series))
        .route("/events", get(handlers::get_events))
        .route("/annotations", get(handlers::get_annotations))
        .with_state(state)
}

/// Binds to the given address and serves the API until shut down.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}

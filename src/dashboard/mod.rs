//! Password-gated web dashboard with live bot statistics.
//!
//! Routes:
//! - `GET /` redirects to `/dashboard` or `/login`
//! - `GET /login`, `POST /login`, `GET /logout`
//! - `GET /dashboard` (HTML) and `GET /api/stats` (JSON), both behind login

/// Login, logout and the session flag
pub mod auth;
/// Statistics snapshot and the pages that show it
pub mod stats;
/// HTML rendering
pub mod views;

use crate::core::state::AppState;
use crate::errors::{Error, Result};
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info, instrument};

/// State shared by every dashboard handler.
#[derive(Clone)]
pub struct DashboardState {
    /// Bot state the statistics are read from
    pub app: Arc<AppState>,
    /// Number of registered prefix commands
    pub command_count: usize,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("Dashboard request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong!").into_response()
    }
}

/// Builds the dashboard router with an in-memory session store.
pub fn router(state: DashboardState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(1)));

    Router::new()
        .route("/", get(auth::index))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/dashboard", get(stats::dashboard))
        .route("/api/stats", get(stats::api_stats))
        .layer(sessions)
        .with_state(state)
}

/// Serves the dashboard on the configured address until the listener fails.
#[instrument(skip_all)]
pub async fn serve(state: DashboardState) -> Result<()> {
    let bind = state.app.config.dashboard.bind.clone();
    let port = state.app.config.dashboard.port;

    let listener = tokio::net::TcpListener::bind((bind.as_str(), port)).await?;
    info!("Dashboard running on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

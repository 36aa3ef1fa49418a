//! Aggregate statistics shown on the dashboard.

use super::auth::AuthSession;
use super::{DashboardState, views};
use crate::core::guilds::GuildSummary;
use crate::core::state::{AppState, format_uptime};
use crate::errors::Result;
use axum::{
    Json,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;

/// Snapshot of the bot's reach and health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    /// Guilds the bot is in
    pub server_count: usize,
    /// Members across those guilds
    pub user_count: u64,
    /// Registered prefix commands
    pub command_count: usize,
    /// Process uptime as `Xd Yh Zm`
    pub uptime: String,
    /// Per-guild breakdown
    pub servers: Vec<GuildSummary>,
}

impl DashboardStats {
    /// Takes a snapshot of `state`.
    #[must_use]
    pub fn collect(state: &AppState, command_count: usize) -> Self {
        Self {
            server_count: state.guilds.guild_count(),
            user_count: state.guilds.member_total(),
            command_count,
            uptime: format_uptime(state.uptime()),
            servers: state.guilds.summaries(),
        }
    }
}

/// `GET /dashboard`
pub async fn dashboard(State(state): State<DashboardState>, session: Session) -> Result<Response> {
    if !AuthSession::new(&session).is_authenticated().await? {
        return Ok(Redirect::to("/login").into_response());
    }
    let stats = DashboardStats::collect(&state.app, state.command_count);
    Ok(Html(views::dashboard_page(&stats)).into_response())
}

/// `GET /api/stats`
pub async fn api_stats(State(state): State<DashboardState>, session: Session) -> Result<Response> {
    if !AuthSession::new(&session).is_authenticated().await? {
        return Ok(Redirect::to("/login").into_response());
    }
    Ok(Json(DashboardStats::collect(&state.app, state.command_count)).into_response())
}

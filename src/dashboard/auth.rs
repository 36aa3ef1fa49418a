//! Shared-credential login for the dashboard.

use super::{DashboardState, views};
use crate::errors::Result;
use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, warn};

const SESSION_AUTHENTICATED: &str = "authenticated";

/// Typed access to the authentication flag stored in the session.
pub struct AuthSession<'a> {
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Wraps a tower-sessions `Session`.
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Whether this session has logged in.
    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self
            .session
            .get::<bool>(SESSION_AUTHENTICATED)
            .await?
            .unwrap_or(false))
    }

    /// Marks the session as logged in.
    pub async fn login(&self) -> Result<()> {
        self.session.insert(SESSION_AUTHENTICATED, true).await?;
        Ok(())
    }

    /// Drops all session data.
    pub async fn logout(&self) -> Result<()> {
        self.session.flush().await?;
        Ok(())
    }
}

/// Body of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// `GET /`
pub async fn index(session: Session) -> Result<Redirect> {
    if AuthSession::new(&session).is_authenticated().await? {
        Ok(Redirect::to("/dashboard"))
    } else {
        Ok(Redirect::to("/login"))
    }
}

/// `GET /login`
pub async fn login_page(session: Session) -> Result<Response> {
    if AuthSession::new(&session).is_authenticated().await? {
        return Ok(Redirect::to("/dashboard").into_response());
    }
    Ok(Html(views::login_page(None)).into_response())
}

/// `POST /login`
pub async fn login(
    State(state): State<DashboardState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let credentials = &state.app.config.dashboard;
    if form.username == credentials.username && form.password == credentials.password {
        AuthSession::new(&session).login().await?;
        info!("Dashboard login for {}", form.username);
        return Ok(Redirect::to("/dashboard").into_response());
    }

    warn!("Rejected dashboard login for {}", form.username);
    Ok(Html(views::login_page(Some("Invalid username or password"))).into_response())
}

/// `GET /logout`
pub async fn logout(session: Session) -> Result<Redirect> {
    AuthSession::new(&session).logout().await?;
    Ok(Redirect::to("/login"))
}

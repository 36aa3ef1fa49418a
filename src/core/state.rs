//! Process-wide state, constructed once at startup and shared by reference.

use crate::config::AppConfig;
use crate::core::chat::{ChatChannels, ChatResponder};
use crate::core::guilds::GuildDirectory;
use crate::core::platform::Platform;
use crate::core::presence::activity_text;
use crate::core::store::{Record, StateStore};
use poise::serenity_prelude::GuildId;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Everything command handlers, event handlers and the dashboard share.
#[derive(Debug)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Persisted record sets
    pub store: StateStore,
    /// Per-channel chat settings
    pub chat: ChatChannels,
    /// Chat reply planner
    pub responder: ChatResponder,
    /// Joined guilds, for the dashboard
    pub guilds: GuildDirectory,
    started_at: Instant,
}

impl AppState {
    /// Builds state over `config.data_dir`. Record sets start empty; call
    /// [`StateStore::load_all`] before serving events.
    #[must_use]
    pub fn new(config: Arc<AppConfig>) -> Self {
        Self {
            store: StateStore::new(&config.data_dir),
            responder: ChatResponder::new(&config.chat),
            chat: ChatChannels::new(),
            guilds: GuildDirectory::new(),
            started_at: Instant::now(),
            config,
        }
    }

    /// Prefix for a guild: its own override, else the global one.
    #[must_use]
    pub fn prefix_for(&self, guild_id: Option<GuildId>) -> String {
        guild_id
            .and_then(|g| self.store.prefixes.read(|p| p.prefix_for(g)))
            .unwrap_or_else(|| self.config.prefix.clone())
    }

    /// Time since the state was built.
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Shows the guild's configured status with the help hint as activity.
    pub async fn refresh_presence(&self, platform: &dyn Platform, guild_id: GuildId) {
        let status = self.store.server_statuses.read(|s| s.status_for(guild_id));
        let prefix = self.prefix_for(Some(guild_id));
        platform.set_presence(status, &activity_text(&prefix)).await;
    }

    /// Records a newly seen guild with the default status, persisting if it
    /// was not known before.
    pub async fn guild_joined(&self, guild_id: GuildId) {
        if self
            .store
            .server_statuses
            .update(|s| s.insert_default(guild_id))
        {
            info!(%guild_id, "Initialized server status");
            self.store.flush(Record::ServerStatuses).await;
        }
    }
}

/// Formats a duration as `Xd Yh Zm`.
#[must_use]
pub fn format_uptime(uptime: Duration) -> String {
    let minutes = uptime.as_secs() / 60;
    let (days, hours, minutes) = (minutes / 1440, (minutes / 60) % 24, minutes % 60);
    format!("{days}d {hours}h {minutes}m")
}

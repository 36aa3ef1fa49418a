//! Shared test utilities.
//!
//! Provides an in-memory [`Platform`] that records everything sent through
//! it, builders for inbound messages, and a configurable stub command.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crate::config::AppConfig;
use crate::core::audit::LogEntry;
use crate::core::command::{Command, CommandContext, CommandRegistry, IncomingMessage, Invoker};
use crate::core::dispatch::Dispatcher;
use crate::core::platform::Platform;
use crate::core::presence::ServerStatus;
use crate::core::state::AppState;
use crate::core::store::{Record, StateStore};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, Permissions, RoleId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

/// Guild every built message belongs to.
pub const TEST_GUILD: GuildId = GuildId::new(1);
/// Channel every built message is posted in.
pub const TEST_CHANNEL: ChannelId = ChannelId::new(100);

/// Routes tracing output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace")))
        .with_test_writer()
        .try_init();
}

/// A store over a fresh temporary directory. Keep the directory alive for the
/// duration of the test.
pub fn test_store() -> (TempDir, StateStore) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = StateStore::new(dir.path());
    (dir, store)
}

/// Default-configured state over a fresh temporary directory, already loaded.
pub async fn test_state() -> (TempDir, AppState) {
    test_state_with(AppConfig::default()).await
}

/// Like [`test_state`], with a custom configuration. `data_dir` is replaced.
pub async fn test_state_with(mut config: AppConfig) -> (TempDir, AppState) {
    init_test_tracing();
    let dir = tempfile::tempdir().expect("create temp dir");
    config.data_dir = dir.path().to_path_buf();
    let state = AppState::new(Arc::new(config));
    state.store.load_all().await;
    (dir, state)
}

/// A guild message from a non-bot user in [`TEST_CHANNEL`].
pub fn message(content: &str, author_id: u64) -> IncomingMessage {
    IncomingMessage {
        id: MessageId::new(1),
        content: content.to_string(),
        author: Invoker {
            id: UserId::new(author_id),
            tag: format!("user{author_id}"),
            bot: false,
        },
        guild_id: Some(TEST_GUILD),
        channel_id: TEST_CHANNEL,
        channel_name: "general".to_string(),
    }
}

/// Runs one command handler directly, skipping the gates, as user `7` in
/// [`TEST_CHANNEL`]. `content` includes the prefix.
pub async fn invoke(
    command: &dyn Command,
    state: &AppState,
    platform: &RecordingPlatform,
    content: &str,
) -> Result<()> {
    let registry = CommandRegistry::new();
    invoke_with(command, &registry, state, platform, content).await
}

/// Like [`invoke`], with a registry visible to the handler.
pub async fn invoke_with(
    command: &dyn Command,
    registry: &CommandRegistry,
    state: &AppState,
    platform: &RecordingPlatform,
    content: &str,
) -> Result<()> {
    let message = message(content, 7);
    let prefix = state.prefix_for(message.guild_id);
    let (_, args) = Dispatcher::parse(content, &prefix).expect("content starts with the prefix");
    let ctx = CommandContext {
        message: &message,
        platform,
        state,
        registry,
        prefix: &prefix,
    };
    command.execute(&ctx, &args).await
}

/// Something the platform was asked to do.
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    /// Plain text to a channel
    Text {
        /// Target channel
        channel: ChannelId,
        /// Content
        text: String,
    },
    /// Reply to a message
    Reply {
        /// Target channel
        channel: ChannelId,
        /// Content
        text: String,
    },
    /// Embed to a channel
    Entry {
        /// Target channel
        channel: ChannelId,
        /// Entry rendered
        entry: LogEntry,
    },
    /// Role assignment
    Role {
        /// Member
        user: UserId,
        /// Role given
        role: RoleId,
    },
    /// Member removal
    Kick {
        /// Member
        user: UserId,
        /// Audit reason
        reason: String,
    },
    /// Typing indicator
    Typing {
        /// Target channel
        channel: ChannelId,
    },
    /// Presence update
    Presence {
        /// Status shown
        status: ServerStatus,
        /// Activity text
        activity: String,
    },
}

/// A [`Platform`] that answers from fixed tables and records every action.
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    permissions: HashMap<UserId, Permissions>,
    channels: HashSet<ChannelId>,
    roles: HashMap<RoleId, String>,
    system_channel: Option<ChannelId>,
    failing: bool,
    sent: Mutex<Vec<Sent>>,
}

impl RecordingPlatform {
    /// No permissions, channels or roles.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `permissions` to `user` in every channel.
    pub fn with_permissions(mut self, user: UserId, permissions: Permissions) -> Self {
        self.permissions.insert(user, permissions);
        self
    }

    /// Makes `channel` resolvable.
    pub fn with_channel(mut self, channel: ChannelId) -> Self {
        self.channels.insert(channel);
        self
    }

    /// Adds a role to the guild.
    pub fn with_role(mut self, role: RoleId, name: &str) -> Self {
        self.roles.insert(role, name.to_string());
        self
    }

    /// Sets the guild's system channel.
    pub fn with_system_channel(mut self, channel: ChannelId) -> Self {
        self.system_channel = Some(channel);
        self
    }

    /// Makes every fallible call fail without recording anything.
    pub fn failing_sends(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Everything recorded so far, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// Plain text and replies, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|s| match s {
                Sent::Text { text, .. } | Sent::Reply { text, .. } => Some(text),
                _ => None,
            })
            .collect()
    }

    fn record(&self, sent: Sent) -> Result<()> {
        if self.failing {
            return Err(Error::Command {
                message: "delivery failed".to_string(),
            });
        }
        self.sent.lock().unwrap().push(sent);
        Ok(())
    }
}

#[async_trait]
impl Platform for RecordingPlatform {
    async fn permissions_in(
        &self,
        _guild_id: GuildId,
        _channel_id: ChannelId,
        user_id: UserId,
    ) -> Option<Permissions> {
        Some(
            self.permissions
                .get(&user_id)
                .copied()
                .unwrap_or_else(Permissions::empty),
        )
    }

    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<()> {
        self.record(Sent::Text {
            channel: channel_id,
            text: text.to_string(),
        })
    }

    async fn reply(&self, channel_id: ChannelId, _message_id: MessageId, text: &str) -> Result<()> {
        self.record(Sent::Reply {
            channel: channel_id,
            text: text.to_string(),
        })
    }

    async fn send_entry(&self, channel_id: ChannelId, entry: &LogEntry) -> Result<()> {
        self.record(Sent::Entry {
            channel: channel_id,
            entry: entry.clone(),
        })
    }

    async fn channel_exists(&self, _guild_id: GuildId, channel_id: ChannelId) -> bool {
        self.channels.contains(&channel_id)
    }

    async fn system_channel(&self, _guild_id: GuildId) -> Option<ChannelId> {
        self.system_channel
    }

    async fn set_presence(&self, status: ServerStatus, activity: &str) {
        let _ = self.record(Sent::Presence {
            status,
            activity: activity.to_string(),
        });
    }

    async fn assign_role(&self, _guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()> {
        self.record(Sent::Role {
            user: user_id,
            role: role_id,
        })
    }

    async fn role_name(&self, _guild_id: GuildId, role_id: RoleId) -> Option<String> {
        self.roles.get(&role_id).cloned()
    }

    async fn kick(&self, _guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()> {
        self.record(Sent::Kick {
            user: user_id,
            reason: reason.to_string(),
        })
    }

    async fn broadcast_typing(&self, channel_id: ChannelId) -> Result<()> {
        self.record(Sent::Typing {
            channel: channel_id,
        })
    }
}

/// A command whose metadata and outcome are set by the test.
///
/// On success it says `ran <name>` in the invoking channel.
pub struct StubCommand {
    name: &'static str,
    aliases: &'static [&'static str],
    permissions: Permissions,
    cooldown: u32,
    category: &'static str,
    mutates: &'static [Record],
    failure: Option<&'static str>,
    action: Option<fn(&AppState)>,
}

impl StubCommand {
    /// A general command with the default cooldown that succeeds.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            permissions: Permissions::empty(),
            cooldown: crate::core::cooldown::DEFAULT_COOLDOWN_SECS,
            category: "general",
            mutates: &[],
            failure: None,
            action: None,
        }
    }

    /// Sets the aliases.
    pub const fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    /// Sets the required permissions.
    pub const fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Sets the cooldown.
    pub const fn cooldown(mut self, secs: u32) -> Self {
        self.cooldown = secs;
        self
    }

    /// Sets the category.
    pub const fn category(mut self, category: &'static str) -> Self {
        self.category = category;
        self
    }

    /// Declares mutated record sets.
    pub const fn mutates(mut self, records: &'static [Record]) -> Self {
        self.mutates = records;
        self
    }

    /// Makes the handler fail with `message`.
    pub const fn failing(mut self, message: &'static str) -> Self {
        self.failure = Some(message);
        self
    }

    /// Runs `action` against the shared state before finishing.
    pub const fn action(mut self, action: fn(&AppState)) -> Self {
        self.action = Some(action);
        self
    }
}

#[async_trait]
impl Command for StubCommand {
    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        "Test command"
    }

    fn aliases(&self) -> &'static [&'static str] {
        self.aliases
    }

    fn permissions(&self) -> Permissions {
        self.permissions
    }

    fn cooldown(&self) -> u32 {
        self.cooldown
    }

    fn category(&self) -> &'static str {
        self.category
    }

    fn mutates(&self) -> &'static [Record] {
        self.mutates
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> Result<()> {
        if let Some(action) = self.action {
            action(ctx.state);
        }
        if let Some(message) = self.failure {
            return Err(Error::Command {
                message: message.to_string(),
            });
        }
        ctx.say(format!("ran {}", self.name)).await
    }
}

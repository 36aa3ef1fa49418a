//! Prefix commands: the [`Command`] capability, the context handlers run in,
//! and the registry they are resolved from.

use crate::core::cooldown::DEFAULT_COOLDOWN_SECS;
use crate::core::platform::Platform;
use crate::core::state::AppState;
use crate::core::store::Record;
use crate::errors::{Error, Result};
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, Permissions, UserId};
use std::collections::HashMap;
use tracing::warn;

/// Who sent a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoker {
    /// User id
    pub id: UserId,
    /// Display tag, e.g. `name#0001` or `name`
    pub tag: String,
    /// Whether the author is a bot account
    pub bot: bool,
}

/// The parts of an inbound message the bot acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingMessage {
    /// Message id, used for replies
    pub id: MessageId,
    /// Raw text
    pub content: String,
    /// Author
    pub author: Invoker,
    /// Guild, or `None` in direct messages
    pub guild_id: Option<GuildId>,
    /// Channel the message was posted in
    pub channel_id: ChannelId,
    /// Channel name, for log entries
    pub channel_name: String,
}

/// Everything a command handler can reach.
pub struct CommandContext<'a> {
    /// The invoking message
    pub message: &'a IncomingMessage,
    /// Outbound delivery and permission queries
    pub platform: &'a dyn Platform,
    /// Shared bot state
    pub state: &'a AppState,
    /// Registered commands, for help output
    pub registry: &'a CommandRegistry,
    /// Prefix the command was invoked with
    pub prefix: &'a str,
}

impl CommandContext<'_> {
    /// Sends text to the invoking channel.
    pub async fn say(&self, text: impl AsRef<str> + Send) -> Result<()> {
        self.platform
            .send_text(self.message.channel_id, text.as_ref())
            .await
    }

    /// Replies to the invoking message.
    pub async fn reply(&self, text: impl AsRef<str> + Send) -> Result<()> {
        self.platform
            .reply(self.message.channel_id, self.message.id, text.as_ref())
            .await
    }

    /// Guild the command was invoked in.
    pub fn guild_id(&self) -> Result<GuildId> {
        self.message.guild_id.ok_or_else(|| Error::Command {
            message: "This command can only be used in a server".to_string(),
        })
    }
}

/// A prefix command. Implementations are registered once at startup and
/// never change afterwards.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, lowercase
    fn name(&self) -> &'static str;

    /// One-line description for help output
    fn description(&self) -> &'static str;

    /// Argument synopsis, without the prefix and name
    fn usage(&self) -> &'static str {
        ""
    }

    /// Alternative names, lowercase
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Permissions the invoker must hold in the invoking channel
    fn permissions(&self) -> Permissions {
        Permissions::empty()
    }

    /// Minimum seconds between uses by the same invoker
    fn cooldown(&self) -> u32 {
        DEFAULT_COOLDOWN_SECS
    }

    /// Category tag, used for help grouping and audit classification
    fn category(&self) -> &'static str {
        "general"
    }

    /// Record sets this command may change; flushed after it succeeds
    fn mutates(&self) -> &'static [Record] {
        &[]
    }

    /// Runs the command.
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()>;
}

/// Whether a command alters server state and should be audited.
#[must_use]
pub fn is_moderation_impacting(command: &dyn Command) -> bool {
    command.category() == "moderation"
        || command.name() == "setup"
        || command.permissions().contains(Permissions::MANAGE_GUILD)
}

/// Commands by name, plus an alias table.
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Box<dyn Command>>,
    by_name: HashMap<String, usize>,
    aliases: HashMap<String, String>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command. A later command with the same name replaces the
    /// earlier one; a clashing alias points at the later command.
    pub fn register(&mut self, command: impl Command + 'static) {
        let name = command.name().to_lowercase();
        for alias in command.aliases() {
            let alias = alias.to_lowercase();
            if let Some(previous) = self.aliases.insert(alias.clone(), name.clone()) {
                warn!("Alias '{}' moved from '{}' to '{}'", alias, previous, name);
            }
        }

        if let Some(&index) = self.by_name.get(&name) {
            warn!("Command '{}' registered twice, keeping the latest", name);
            self.commands[index] = Box::new(command);
        } else {
            self.by_name.insert(name, self.commands.len());
            self.commands.push(Box::new(command));
        }
    }

    /// Resolves a lowercase token: exact name, then the alias table, then a
    /// scan of every command's own alias list.
    #[must_use]
    pub fn resolve(&self, token: &str) -> Option<&dyn Command> {
        if let Some(&index) = self.by_name.get(token) {
            return Some(self.commands[index].as_ref());
        }
        if let Some(&index) = self
            .aliases
            .get(token)
            .and_then(|name| self.by_name.get(name))
        {
            return Some(self.commands[index].as_ref());
        }
        self.commands
            .iter()
            .find(|command| command.aliases().iter().any(|a| a.eq_ignore_ascii_case(token)))
            .map(AsRef::as_ref)
    }

    /// Registered commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.iter().map(AsRef::as_ref)
    }

    /// Number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no commands are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

//! Prefix command pipeline: parse, resolve, permission gate, cooldown gate,
//! execute, then persist and audit.

use crate::core::audit::{self, server_action, server_action_error};
use crate::core::command::{CommandContext, CommandRegistry, IncomingMessage, is_moderation_impacting};
use crate::core::cooldown::{CooldownStatus, CooldownTracker};
use crate::core::platform::Platform;
use crate::core::state::AppState;
use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument, warn};

/// Reply sent when the invoker lacks the command's permissions.
pub const PERMISSION_DENIED_REPLY: &str = "You do not have permission to use this command!";

/// Reply sent when a handler fails.
pub const EXECUTION_ERROR_REPLY: &str = "There was an error executing that command!";

/// What happened to an inbound message.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Not a command: bot author, no prefix, or unknown name
    Ignored,
    /// Permission gate rejected the invoker
    Denied,
    /// Cooldown gate rejected the invoker
    CoolingDown {
        /// Seconds until the command is available again
        remaining_secs: f64,
    },
    /// The handler ran and returned `Ok`
    Completed,
    /// The handler ran and returned an error
    Failed {
        /// Error text
        message: String,
    },
}

/// Owns the command registry and the cooldown tracker.
pub struct Dispatcher {
    registry: CommandRegistry,
    cooldowns: CooldownTracker,
}

impl Dispatcher {
    /// Creates a dispatcher over a fully built registry.
    #[must_use]
    pub fn new(registry: CommandRegistry) -> Self {
        Self {
            registry,
            cooldowns: CooldownTracker::new(),
        }
    }

    /// Registered commands.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Splits `content` into a lowercase command token and its arguments, or
    /// `None` if it does not start with `prefix` or names nothing.
    #[must_use]
    pub fn parse(content: &str, prefix: &str) -> Option<(String, Vec<String>)> {
        let rest = content.strip_prefix(prefix)?;
        let mut tokens = rest.split_whitespace();
        let name = tokens.next()?.to_lowercase();
        Some((name, tokens.map(str::to_string).collect()))
    }

    /// Runs one inbound message through the pipeline.
    ///
    /// Every rejected or failed invocation produces exactly one reply.
    /// Audit entries are best effort and never reach the invoker.
    #[instrument(skip_all, fields(author = %message.author.id, channel = %message.channel_id))]
    pub async fn dispatch(
        &self,
        message: &IncomingMessage,
        platform: &dyn Platform,
        state: &AppState,
        now: DateTime<Utc>,
    ) -> Outcome {
        if message.author.bot {
            return Outcome::Ignored;
        }

        let prefix = state.prefix_for(message.guild_id);
        let Some((token, args)) = Self::parse(&message.content, &prefix) else {
            return Outcome::Ignored;
        };
        let Some(command) = self.registry.resolve(&token) else {
            debug!(token, "Unknown command");
            return Outcome::Ignored;
        };
        let name = command.name();

        let required = command.permissions();
        if !required.is_empty() {
            let granted = match message.guild_id {
                Some(guild_id) => platform
                    .permissions_in(guild_id, message.channel_id, message.author.id)
                    .await
                    .is_some_and(|held| held.contains(required)),
                None => false,
            };
            if !granted {
                debug!(command = name, "Permission denied");
                send_reply(platform, message, PERMISSION_DENIED_REPLY).await;
                return Outcome::Denied;
            }
        }

        if let CooldownStatus::Blocked { remaining_secs } =
            self.cooldowns
                .check_and_record(name, message.author.id, command.cooldown(), now)
        {
            let text = format!(
                "Please wait {remaining_secs:.1} more second(s) before reusing the `{name}` command."
            );
            send_reply(platform, message, &text).await;
            return Outcome::CoolingDown { remaining_secs };
        }

        let ctx = CommandContext {
            message,
            platform,
            state,
            registry: &self.registry,
            prefix: &prefix,
        };
        let audited = is_moderation_impacting(command);

        let result = command.execute(&ctx, &args).await;

        // Handlers can mutate state before failing.
        for record in command.mutates() {
            state.store.flush(*record).await;
        }

        match result {
            Ok(()) => {
                if let (true, Some(guild_id)) = (audited, message.guild_id) {
                    let entry = server_action(
                        &message.author.tag,
                        &prefix,
                        name,
                        &message.channel_name,
                        &args,
                    );
                    audit::send_log(platform, &state.store, guild_id, &entry).await;
                }
                Outcome::Completed
            }
            Err(e) => {
                error!("Error executing command {}: {}", name, e);
                send_reply(platform, message, EXECUTION_ERROR_REPLY).await;
                if let (true, Some(guild_id)) = (audited, message.guild_id) {
                    let entry =
                        server_action_error(&message.author.tag, &prefix, name, &e.to_string());
                    audit::send_log(platform, &state.store, guild_id, &entry).await;
                }
                Outcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }
}

async fn send_reply(platform: &dyn Platform, message: &IncomingMessage, text: &str) {
    if let Err(e) = platform.reply(message.channel_id, message.id, text).await {
        warn!("Failed to reply in {}: {}", message.channel_id, e);
    }
}

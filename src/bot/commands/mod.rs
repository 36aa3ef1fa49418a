//! Prefix command implementations organized by category.

/// AI question answering
pub mod ai;
/// Chat participation toggle
pub mod chat;
/// Ping and help
pub mod general;
/// Custom stored messages
pub mod messages;
/// Kick, auto-role and log channel
pub mod moderation;
/// Per-server status and prefix
pub mod server;
/// Mention parsing and usage replies
pub mod utils;

use crate::config::AppConfig;
use crate::core::command::CommandRegistry;
use tracing::info;

/// Builds the registry of every command available with `config`.
#[must_use]
pub fn build_registry(config: &AppConfig) -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(general::Ping);
    registry.register(general::Help);
    registry.register(moderation::Kick);
    registry.register(moderation::AutoRole);
    registry.register(moderation::SetLogs);
    registry.register(server::SetStatus);
    registry.register(server::SetPrefix);
    registry.register(chat::Chat);
    registry.register(messages::AddMessage);
    registry.register(messages::ShowMessage);

    match ai::Ask::from_config(&config.ai) {
        Some(ask) => registry.register(ask),
        None => info!("OPENAI_API_KEY not set, AI commands disabled"),
    }

    info!("Registered {} commands", registry.len());
    registry
}

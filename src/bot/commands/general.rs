//! General commands: ping and help.

use super::utils::usage_line;
use crate::core::audit::{EntryColor, LogEntry};
use crate::core::command::{Command, CommandContext};
use crate::core::state::format_uptime;
use crate::errors::Result;
use async_trait::async_trait;

/// Health check.
pub struct Ping;

#[async_trait]
impl Command for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["latency"]
    }

    fn description(&self) -> &'static str {
        "Checks that the bot is responsive"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, _args: &[String]) -> Result<()> {
        ctx.reply(format!(
            "🏓 Pong! Up for {}.",
            format_uptime(ctx.state.uptime())
        ))
        .await
    }
}

/// Lists commands, or details one of them.
pub struct Help;

impl Help {
    fn overview(ctx: &CommandContext<'_>) -> LogEntry {
        let mut categories: Vec<(&str, Vec<String>)> = Vec::new();
        for command in ctx.registry.iter() {
            let name = format!("`{}{}`", ctx.prefix, command.name());
            match categories.iter_mut().find(|(c, _)| *c == command.category()) {
                Some((_, names)) => names.push(name),
                None => categories.push((command.category(), vec![name])),
            }
        }

        categories.into_iter().fold(
            LogEntry::new("📚 Commands", EntryColor::Info).description(format!(
                "Use `{}help <command>` for details on a command.",
                ctx.prefix
            )),
            |entry, (category, names)| entry.field(capitalize(category), names.join(", ")),
        )
    }

    fn details(ctx: &CommandContext<'_>, command: &dyn Command) -> LogEntry {
        let mut entry = LogEntry::new(format!("📖 {}{}", ctx.prefix, command.name()), EntryColor::Info)
            .description(command.description())
            .field("Usage", usage_line(ctx.prefix, command))
            .field("Cooldown", format!("{} second(s)", command.cooldown()));
        if !command.aliases().is_empty() {
            entry = entry.field("Aliases", command.aliases().join(", "));
        }
        let permissions = command.permissions();
        if !permissions.is_empty() {
            entry = entry.field("Permissions", permissions.get_permission_names().join(", "));
        }
        entry
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[async_trait]
impl Command for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["commands", "h"]
    }

    fn description(&self) -> &'static str {
        "Lists commands or shows details for one"
    }

    fn usage(&self) -> &'static str {
        "[command]"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let entry = match args.first() {
            None => Self::overview(ctx),
            Some(token) => match ctx.registry.resolve(&token.to_lowercase()) {
                Some(command) => Self::details(ctx, command),
                None => {
                    return ctx
                        .reply(format!("No command named `{token}`."))
                        .await;
                }
            },
        };
        ctx.platform
            .send_entry(ctx.message.channel_id, &entry)
            .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::command::CommandRegistry;
    use crate::test_utils::{RecordingPlatform, Sent, invoke, invoke_with, test_state};

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        registry.register(Ping);
        registry.register(Help);
        registry
    }

    fn entry(platform: &RecordingPlatform) -> LogEntry {
        platform
            .sent()
            .into_iter()
            .find_map(|s| match s {
                Sent::Entry { entry, .. } => Some(entry),
                _ => None,
            })
            .unwrap()
    }

    #[tokio::test]
    async fn test_ping_replies_pong() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&Ping, &state, &platform, "!ping").await.unwrap();
        assert!(platform.texts()[0].starts_with("🏓 Pong!"));
    }

    #[tokio::test]
    async fn test_help_groups_by_category() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke_with(&Help, &registry(), &state, &platform, "!help")
            .await
            .unwrap();
        let entry = entry(&platform);
        assert_eq!(entry.field_value("General"), Some("`!ping`, `!help`"));
    }

    #[tokio::test]
    async fn test_help_for_alias_shows_details() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke_with(&Help, &registry(), &state, &platform, "!help LATENCY")
            .await
            .unwrap();
        let entry = entry(&platform);
        assert_eq!(entry.title, "📖 !ping");
        assert_eq!(entry.field_value("Usage"), Some("`!ping`"));
        assert_eq!(entry.field_value("Aliases"), Some("latency"));
    }

    #[tokio::test]
    async fn test_help_for_unknown_command() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke_with(&Help, &registry(), &state, &platform, "!help nope")
            .await
            .unwrap();
        assert_eq!(platform.texts(), vec!["No command named `nope`.".to_string()]);
    }
}

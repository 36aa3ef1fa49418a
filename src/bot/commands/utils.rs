//! Argument helpers shared by the prefix commands.

use crate::core::command::{Command, CommandContext};
use crate::core::store::parse_id;
use crate::errors::Result;
use poise::serenity_prelude::{ChannelId, RoleId, UserId};

/// Strips `open` and `>` around a mention, or accepts a bare id.
fn mention_id(arg: &str, opens: &[&str]) -> Option<u64> {
    let inner = opens
        .iter()
        .find_map(|open| arg.strip_prefix(open).and_then(|rest| rest.strip_suffix('>')))
        .unwrap_or(arg);
    parse_id(inner)
}

/// `<@id>`, `<@!id>` or a bare id.
#[must_use]
pub fn parse_user(arg: &str) -> Option<UserId> {
    mention_id(arg, &["<@!", "<@"]).map(UserId::new)
}

/// `<@&id>` or a bare id.
#[must_use]
pub fn parse_role(arg: &str) -> Option<RoleId> {
    mention_id(arg, &["<@&"]).map(RoleId::new)
}

/// `<#id>` or a bare id.
#[must_use]
pub fn parse_channel(arg: &str) -> Option<ChannelId> {
    mention_id(arg, &["<#"]).map(ChannelId::new)
}

/// `` `!name usage` `` for a command.
#[must_use]
pub fn usage_line(prefix: &str, command: &dyn Command) -> String {
    let line = format!("{prefix}{} {}", command.name(), command.usage());
    format!("`{}`", line.trim_end())
}

/// Replies with the command's usage line.
pub async fn reply_usage(ctx: &CommandContext<'_>, command: &dyn Command) -> Result<()> {
    ctx.reply(format!("Usage: {}", usage_line(ctx.prefix, command)))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mentions() {
        assert_eq!(parse_user("<@123>"), Some(UserId::new(123)));
        assert_eq!(parse_user("<@!123>"), Some(UserId::new(123)));
        assert_eq!(parse_user("123"), Some(UserId::new(123)));
        assert_eq!(parse_role("<@&9>"), Some(RoleId::new(9)));
        assert_eq!(parse_channel("<#42>"), Some(ChannelId::new(42)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(parse_user("someone"), None);
        assert_eq!(parse_user("<@0>"), None);
        assert_eq!(parse_role("<@&abc>"), None);
        assert_eq!(parse_channel("<#42"), None);
        assert_eq!(parse_user("<#42>"), None);
    }
}

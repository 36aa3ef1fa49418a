//! Moderation commands: kick, auto-role and audit log channel.

use super::utils::{parse_channel, parse_role, parse_user, reply_usage};
use crate::core::command::{Command, CommandContext};
use crate::core::store::Record;
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude::Permissions;
use tracing::info;

/// Removes a member from the guild.
pub struct Kick;

#[async_trait]
impl Command for Kick {
    fn name(&self) -> &'static str {
        "kick"
    }

    fn description(&self) -> &'static str {
        "Kicks a member from the server"
    }

    fn usage(&self) -> &'static str {
        "<@user> [reason]"
    }

    fn permissions(&self) -> Permissions {
        Permissions::KICK_MEMBERS
    }

    fn cooldown(&self) -> u32 {
        5
    }

    fn category(&self) -> &'static str {
        "moderation"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let guild_id = ctx.guild_id()?;
        let Some(target) = args.first().and_then(|a| parse_user(a)) else {
            return reply_usage(ctx, self).await;
        };
        if target == ctx.message.author.id {
            return ctx.reply("You cannot kick yourself!").await;
        }

        let reason = match args.get(1..) {
            Some(rest) if !rest.is_empty() => rest.join(" "),
            _ => "No reason provided".to_string(),
        };
        ctx.platform.kick(guild_id, target, &reason).await?;
        info!(%guild_id, %target, "Member kicked by {}", ctx.message.author.tag);
        ctx.reply(format!("✅ Kicked <@{target}>. Reason: {reason}"))
            .await
    }
}

/// Configures the role handed to new members.
pub struct AutoRole;

#[async_trait]
impl Command for AutoRole {
    fn name(&self) -> &'static str {
        "autorole"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ar"]
    }

    fn description(&self) -> &'static str {
        "Sets, clears or shows the role given to new members"
    }

    fn usage(&self) -> &'static str {
        "<set @role | clear | show>"
    }

    fn permissions(&self) -> Permissions {
        Permissions::MANAGE_ROLES
    }

    fn category(&self) -> &'static str {
        "moderation"
    }

    fn mutates(&self) -> &'static [Record] {
        &[Record::AutoRoles]
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let guild_id = ctx.guild_id()?;
        let roles = &ctx.state.store.auto_roles;

        match args.first().map(|a| a.to_lowercase()).as_deref() {
            Some("set") => {
                let Some(role_id) = args.get(1).and_then(|a| parse_role(a)) else {
                    return reply_usage(ctx, self).await;
                };
                let Some(role_name) = ctx.platform.role_name(guild_id, role_id).await else {
                    return ctx.reply("That role does not exist in this server.").await;
                };
                roles.update(|r| r.set(guild_id, role_id));
                info!(%guild_id, %role_id, "Auto-role set");
                ctx.reply(format!("✅ New members will now receive the **{role_name}** role."))
                    .await
            }
            Some("clear") => {
                if roles.update(|r| r.clear(guild_id)) {
                    ctx.reply("✅ Auto-role cleared.").await
                } else {
                    ctx.reply("No auto-role was set for this server.").await
                }
            }
            Some("show") => match roles.read(|r| r.role_for(guild_id)) {
                Some(role_id) => {
                    let name = ctx
                        .platform
                        .role_name(guild_id, role_id)
                        .await
                        .unwrap_or_else(|| format!("unknown role {role_id}"));
                    ctx.reply(format!("New members receive the **{name}** role."))
                        .await
                }
                None => ctx.reply("No auto-role is configured.").await,
            },
            _ => reply_usage(ctx, self).await,
        }
    }
}

/// Chooses the channel audit entries go to.
pub struct SetLogs;

#[async_trait]
impl Command for SetLogs {
    fn name(&self) -> &'static str {
        "setlogs"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["logchannel"]
    }

    fn description(&self) -> &'static str {
        "Sets or disables the moderation log channel"
    }

    fn usage(&self) -> &'static str {
        "<#channel | off>"
    }

    fn permissions(&self) -> Permissions {
        Permissions::MANAGE_GUILD
    }

    fn category(&self) -> &'static str {
        "config"
    }

    fn mutates(&self) -> &'static [Record] {
        &[Record::LogChannels]
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let guild_id = ctx.guild_id()?;
        let channels = &ctx.state.store.log_channels;

        let Some(arg) = args.first() else {
            return match channels.read(|c| c.channel_for(guild_id)) {
                Some(channel_id) => ctx.reply(format!("Logs are sent to <#{channel_id}>.")).await,
                None => reply_usage(ctx, self).await,
            };
        };

        if arg.eq_ignore_ascii_case("off") {
            channels.update(|c| c.remove(guild_id));
            return ctx.reply("✅ Moderation logging disabled.").await;
        }

        let Some(channel_id) = parse_channel(arg) else {
            return reply_usage(ctx, self).await;
        };
        if !ctx.platform.channel_exists(guild_id, channel_id).await {
            return ctx.reply("That channel does not exist in this server.").await;
        }
        channels.update(|c| c.set(guild_id, channel_id));
        ctx.reply(format!("✅ Moderation logs will be sent to <#{channel_id}>."))
            .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{RecordingPlatform, Sent, TEST_GUILD, invoke, test_state};
    use poise::serenity_prelude::{ChannelId, RoleId, UserId};

    #[tokio::test]
    async fn test_kick_with_reason() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&Kick, &state, &platform, "!kick <@55> being rude")
            .await
            .unwrap();

        assert!(platform.sent().contains(&Sent::Kick {
            user: UserId::new(55),
            reason: "being rude".to_string()
        }));
        assert_eq!(
            platform.texts(),
            vec!["✅ Kicked <@55>. Reason: being rude".to_string()]
        );
    }

    #[tokio::test]
    async fn test_kick_requires_target_and_refuses_self() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&Kick, &state, &platform, "!kick").await.unwrap();
        invoke(&Kick, &state, &platform, "!kick <@7>").await.unwrap();

        assert_eq!(
            platform.texts(),
            vec![
                "Usage: `!kick <@user> [reason]`".to_string(),
                "You cannot kick yourself!".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_kick_failure_propagates() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new().failing_sends();

        assert!(invoke(&Kick, &state, &platform, "!kick <@55>").await.is_err());
    }

    #[tokio::test]
    async fn test_autorole_set_show_clear() {
        let (_dir, state) = test_state().await;
        let role = RoleId::new(50);
        let platform = RecordingPlatform::new().with_role(role, "Member");

        invoke(&AutoRole, &state, &platform, "!autorole set <@&50>")
            .await
            .unwrap();
        assert_eq!(
            state.store.auto_roles.read(|r| r.role_for(TEST_GUILD)),
            Some(role)
        );

        invoke(&AutoRole, &state, &platform, "!autorole show")
            .await
            .unwrap();
        invoke(&AutoRole, &state, &platform, "!autorole clear")
            .await
            .unwrap();
        invoke(&AutoRole, &state, &platform, "!autorole clear")
            .await
            .unwrap();

        assert_eq!(
            platform.texts(),
            vec![
                "✅ New members will now receive the **Member** role.".to_string(),
                "New members receive the **Member** role.".to_string(),
                "✅ Auto-role cleared.".to_string(),
                "No auto-role was set for this server.".to_string(),
            ]
        );
        assert!(state.store.auto_roles.read(|r| r.is_empty()));
    }

    #[tokio::test]
    async fn test_autorole_rejects_unknown_role() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&AutoRole, &state, &platform, "!autorole set <@&50>")
            .await
            .unwrap();
        assert!(state.store.auto_roles.read(|r| r.is_empty()));
        assert_eq!(
            platform.texts(),
            vec!["That role does not exist in this server.".to_string()]
        );
    }

    #[tokio::test]
    async fn test_setlogs_set_and_disable() {
        let (_dir, state) = test_state().await;
        let channel = ChannelId::new(900);
        let platform = RecordingPlatform::new().with_channel(channel);

        invoke(&SetLogs, &state, &platform, "!setlogs <#900>")
            .await
            .unwrap();
        assert_eq!(
            state.store.log_channels.read(|c| c.channel_for(TEST_GUILD)),
            Some(channel)
        );

        invoke(&SetLogs, &state, &platform, "!setlogs <#901>")
            .await
            .unwrap();
        assert_eq!(
            state.store.log_channels.read(|c| c.channel_for(TEST_GUILD)),
            Some(channel)
        );

        invoke(&SetLogs, &state, &platform, "!setlogs off")
            .await
            .unwrap();
        assert_eq!(
            state.store.log_channels.read(|c| c.channel_for(TEST_GUILD)),
            None
        );
    }
}

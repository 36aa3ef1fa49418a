//! Per-server configuration: presence status and command prefix.

use super::utils::reply_usage;
use crate::core::command::{Command, CommandContext};
use crate::core::presence::ServerStatus;
use crate::core::store::Record;
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude::Permissions;

/// Longest prefix a guild may configure.
const MAX_PREFIX_LEN: usize = 5;

/// Changes the presence the bot shows while serving this guild.
pub struct SetStatus;

#[async_trait]
impl Command for SetStatus {
    fn name(&self) -> &'static str {
        "setstatus"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["status"]
    }

    fn description(&self) -> &'static str {
        "Sets the bot's status for this server"
    }

    fn usage(&self) -> &'static str {
        "<online | idle | dnd | offline>"
    }

    fn permissions(&self) -> Permissions {
        Permissions::MANAGE_GUILD
    }

    fn category(&self) -> &'static str {
        "config"
    }

    fn mutates(&self) -> &'static [Record] {
        &[Record::ServerStatuses]
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let guild_id = ctx.guild_id()?;
        let statuses = &ctx.state.store.server_statuses;

        let Some(arg) = args.first() else {
            let current = statuses.read(|s| s.status_for(guild_id));
            let options: Vec<&str> = ServerStatus::ALL.iter().map(|s| s.as_str()).collect();
            return ctx
                .reply(format!(
                    "Current status: **{current}**. Options: {}",
                    options.join(", ")
                ))
                .await;
        };

        let Ok(status) = arg.parse::<ServerStatus>() else {
            return reply_usage(ctx, self).await;
        };
        statuses.update(|s| s.set(guild_id, status));
        ctx.state.refresh_presence(ctx.platform, guild_id).await;
        ctx.reply(format!("✅ Status for this server set to **{status}**."))
            .await
    }
}

/// Overrides the command prefix for this guild.
pub struct SetPrefix;

#[async_trait]
impl Command for SetPrefix {
    fn name(&self) -> &'static str {
        "setprefix"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["prefix"]
    }

    fn description(&self) -> &'static str {
        "Changes the command prefix for this server"
    }

    fn usage(&self) -> &'static str {
        "<prefix | reset>"
    }

    fn permissions(&self) -> Permissions {
        Permissions::MANAGE_GUILD
    }

    fn category(&self) -> &'static str {
        "config"
    }

    fn mutates(&self) -> &'static [Record] {
        &[Record::Prefixes]
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let guild_id = ctx.guild_id()?;
        let prefixes = &ctx.state.store.prefixes;

        let Some(arg) = args.first() else {
            return reply_usage(ctx, self).await;
        };

        if arg.eq_ignore_ascii_case("reset") {
            prefixes.update(|p| p.clear(guild_id));
            return ctx
                .reply(format!(
                    "✅ Prefix reset to `{}`.",
                    ctx.state.config.prefix
                ))
                .await;
        }

        if arg.chars().count() > MAX_PREFIX_LEN {
            return ctx
                .reply(format!(
                    "Prefixes can be at most {MAX_PREFIX_LEN} characters long."
                ))
                .await;
        }
        prefixes.update(|p| p.set(guild_id, arg.clone()));
        ctx.reply(format!("✅ Prefix for this server set to `{arg}`."))
            .await
    }
}

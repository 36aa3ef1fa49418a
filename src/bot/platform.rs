//! [`Platform`] backed by a live serenity context.

use crate::core::audit::LogEntry;
use crate::core::platform::Platform;
use crate::core::presence::ServerStatus;
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, ActivityData, ChannelId, CreateEmbed, CreateMessage, GuildId, MessageId,
    Permissions, RoleId, Timestamp, UserId,
};
use tracing::debug;

/// Audit log reason attached to auto-role assignments.
const AUTO_ROLE_REASON: &str = "Auto-role on join";

/// Delivers through the gateway connection of one event.
#[derive(Clone)]
pub struct SerenityPlatform {
    ctx: serenity::Context,
}

impl SerenityPlatform {
    /// Wraps the context handed to an event handler.
    #[must_use]
    pub const fn new(ctx: serenity::Context) -> Self {
        Self { ctx }
    }
}

/// Renders an entry as a Discord embed.
#[must_use]
pub fn build_embed(entry: &LogEntry) -> CreateEmbed {
    let timestamp = Timestamp::from_unix_timestamp(entry.timestamp.timestamp())
        .unwrap_or_else(|_| Timestamp::now());
    let mut embed = CreateEmbed::new()
        .title(&entry.title)
        .colour(entry.color.rgb())
        .timestamp(timestamp);
    if !entry.description.is_empty() {
        embed = embed.description(&entry.description);
    }
    for (name, value) in &entry.fields {
        embed = embed.field(name, value, false);
    }
    embed
}

#[async_trait]
impl Platform for SerenityPlatform {
    async fn permissions_in(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Option<Permissions> {
        let member = match guild_id.member(&self.ctx, user_id).await {
            Ok(member) => member,
            Err(e) => {
                debug!(%guild_id, %user_id, "Could not fetch member: {}", e);
                return None;
            }
        };
        let guild = self.ctx.cache.guild(guild_id)?;
        guild
            .channels
            .get(&channel_id)
            .map(|channel| guild.user_permissions_in(channel, &member))
    }

    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<()> {
        channel_id.say(&self.ctx.http, text).await?;
        Ok(())
    }

    async fn reply(&self, channel_id: ChannelId, message_id: MessageId, text: &str) -> Result<()> {
        let message = CreateMessage::new()
            .content(text)
            .reference_message((channel_id, message_id));
        channel_id.send_message(&self.ctx.http, message).await?;
        Ok(())
    }

    async fn send_entry(&self, channel_id: ChannelId, entry: &LogEntry) -> Result<()> {
        let message = CreateMessage::new().embed(build_embed(entry));
        channel_id.send_message(&self.ctx.http, message).await?;
        Ok(())
    }

    async fn channel_exists(&self, guild_id: GuildId, channel_id: ChannelId) -> bool {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.channels.contains_key(&channel_id));
        match cached {
            Some(found) => found,
            None => channel_id.to_channel(&self.ctx).await.is_ok(),
        }
    }

    async fn system_channel(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.ctx
            .cache
            .guild(guild_id)
            .and_then(|guild| guild.system_channel_id)
    }

    async fn set_presence(&self, status: ServerStatus, activity: &str) {
        self.ctx
            .set_presence(Some(ActivityData::watching(activity)), status.online_status());
    }

    async fn assign_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()> {
        self.ctx
            .http
            .add_member_role(guild_id, user_id, role_id, Some(AUTO_ROLE_REASON))
            .await?;
        Ok(())
    }

    async fn role_name(&self, guild_id: GuildId, role_id: RoleId) -> Option<String> {
        let cached = self
            .ctx
            .cache
            .guild(guild_id)
            .map(|guild| guild.roles.get(&role_id).map(|role| role.name.clone()));
        match cached {
            Some(name) => name,
            None => guild_id
                .roles(&self.ctx.http)
                .await
                .ok()?
                .get(&role_id)
                .map(|role| role.name.clone()),
        }
    }

    async fn kick(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()> {
        guild_id
            .kick_with_reason(&self.ctx.http, user_id, reason)
            .await?;
        Ok(())
    }

    async fn broadcast_typing(&self, channel_id: ChannelId) -> Result<()> {
        channel_id.broadcast_typing(&self.ctx.http).await?;
        Ok(())
    }
}

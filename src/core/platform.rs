//! The chat platform as seen by the command pipeline.
//!
//! Everything the core needs from Discord goes through [`Platform`], so the
//! dispatcher, the audit log and the join handler can be exercised without a
//! gateway connection.

use crate::core::audit::LogEntry;
use crate::core::presence::ServerStatus;
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude::{ChannelId, GuildId, MessageId, Permissions, RoleId, UserId};

/// Inbound queries and outbound delivery against the chat platform.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Effective permissions of `user_id` in `channel_id`, or `None` when
    /// they cannot be determined.
    async fn permissions_in(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
        user_id: UserId,
    ) -> Option<Permissions>;

    /// Sends plain text to a channel.
    async fn send_text(&self, channel_id: ChannelId, text: &str) -> Result<()>;

    /// Replies to a specific message.
    async fn reply(&self, channel_id: ChannelId, message_id: MessageId, text: &str) -> Result<()>;

    /// Sends a structured entry (embed) to a channel.
    async fn send_entry(&self, channel_id: ChannelId, entry: &LogEntry) -> Result<()>;

    /// Whether the channel exists in the guild.
    async fn channel_exists(&self, guild_id: GuildId, channel_id: ChannelId) -> bool;

    /// The guild's system channel, if it has one.
    async fn system_channel(&self, guild_id: GuildId) -> Option<ChannelId>;

    /// Updates the bot's presence.
    async fn set_presence(&self, status: ServerStatus, activity: &str);

    /// Gives a role to a guild member.
    async fn assign_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<()>;

    /// Display name of a role, or `None` if the guild has no such role.
    async fn role_name(&self, guild_id: GuildId, role_id: RoleId) -> Option<String>;

    /// Removes a member from the guild.
    async fn kick(&self, guild_id: GuildId, user_id: UserId, reason: &str) -> Result<()>;

    /// Shows the typing indicator in a channel.
    async fn broadcast_typing(&self, channel_id: ChannelId) -> Result<()>;
}

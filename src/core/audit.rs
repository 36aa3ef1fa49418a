//! Structured log entries and best-effort delivery to a guild's log channel.

use crate::core::platform::Platform;
use crate::core::store::StateStore;
use chrono::{DateTime, Utc};
use poise::serenity_prelude::GuildId;
use tracing::{debug, error, trace};

/// Colour classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryColor {
    /// Blue, for routine server actions
    Info,
    /// Green, for joins and welcomes
    Success,
    /// Red, for failures
    Error,
}

impl EntryColor {
    /// RGB value used for the embed side bar.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        match self {
            Self::Info => 0x0099_FF,
            Self::Success => 0x00FF_00,
            Self::Error => 0xFF_0000,
        }
    }
}

/// A structured message rendered as an embed.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// Embed title
    pub title: String,
    /// Side bar colour
    pub color: EntryColor,
    /// Embed body
    pub description: String,
    /// Named fields, in display order
    pub fields: Vec<(String, String)>,
    /// When the action happened
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// Starts an entry stamped with the current time.
    #[must_use]
    pub fn new(title: impl Into<String>, color: EntryColor) -> Self {
        Self {
            title: title.into(),
            color,
            description: String::new(),
            fields: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    /// Sets the body text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a field. Embeds reject empty values, so those become a dash.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() {
            "-".to_string()
        } else {
            value
        };
        self.fields.push((name.into(), value));
        self
    }

    /// Overrides the timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Value of the first field called `name`.
    #[must_use]
    pub fn field_value(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Entry for a moderation-impacting command that completed.
#[must_use]
pub fn server_action(
    invoker_tag: &str,
    prefix: &str,
    command: &str,
    channel_name: &str,
    args: &[String],
) -> LogEntry {
    let details = if args.is_empty() {
        "No additional details".to_string()
    } else {
        args.join(" ")
    };
    LogEntry::new("🛡️ Server Action", EntryColor::Info)
        .description(format!(
            "**{invoker_tag}** used moderation command: {prefix}{command}"
        ))
        .field("Channel", channel_name)
        .field("Details", details)
}

/// Entry for a moderation-impacting command that failed.
#[must_use]
pub fn server_action_error(invoker_tag: &str, prefix: &str, command: &str, error: &str) -> LogEntry {
    LogEntry::new("⚠️ Server Action Error", EntryColor::Error)
        .description(format!(
            "Error executing moderation command: {prefix}{command}"
        ))
        .field("User", invoker_tag)
        .field("Error", error)
}

/// Delivers `entry` to the guild's configured log channel.
///
/// Best effort: no mapping, an unresolvable channel, or a failed send are
/// logged and otherwise ignored.
pub async fn send_log(
    platform: &dyn Platform,
    store: &StateStore,
    guild_id: GuildId,
    entry: &LogEntry,
) {
    let Some(channel_id) = store.log_channels.read(|c| c.channel_for(guild_id)) else {
        trace!(%guild_id, "No log channel configured");
        return;
    };

    if !platform.channel_exists(guild_id, channel_id).await {
        debug!(%guild_id, %channel_id, "Configured log channel cannot be resolved");
        return;
    }

    if let Err(e) = platform.send_entry(channel_id, entry).await {
        error!("Error sending log to {}: {}", channel_id, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{RecordingPlatform, Sent, test_store};
    use poise::serenity_prelude::ChannelId;

    #[test]
    fn test_server_action_without_args() {
        let entry = server_action("mod#0001", "!", "kick", "general", &[]);
        assert_eq!(entry.color, EntryColor::Info);
        assert_eq!(entry.field_value("Details"), Some("No additional details"));
        assert_eq!(entry.field_value("Channel"), Some("general"));
        assert!(entry.description.contains("!kick"));
    }

    #[test]
    fn test_empty_field_value_replaced() {
        let entry = LogEntry::new("t", EntryColor::Success).field("Error", "  ");
        assert_eq!(entry.field_value("Error"), Some("-"));
    }

    #[tokio::test]
    async fn test_send_log_without_mapping_is_noop() {
        let (_dir, store) = test_store();
        let platform = RecordingPlatform::new();

        send_log(&platform, &store, GuildId::new(1), &LogEntry::new("x", EntryColor::Info)).await;
        assert!(platform.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_log_to_unresolvable_channel_is_noop() {
        let (_dir, store) = test_store();
        store
            .log_channels
            .update(|c| c.set(GuildId::new(1), ChannelId::new(99)));
        let platform = RecordingPlatform::new();

        send_log(&platform, &store, GuildId::new(1), &LogEntry::new("x", EntryColor::Info)).await;
        assert!(platform.sent().is_empty());
    }

    #[tokio::test]
    async fn test_send_log_delivers_to_configured_channel() {
        let (_dir, store) = test_store();
        store
            .log_channels
            .update(|c| c.set(GuildId::new(1), ChannelId::new(99)));
        let platform = RecordingPlatform::new().with_channel(ChannelId::new(99));
        let entry = LogEntry::new("x", EntryColor::Info);

        send_log(&platform, &store, GuildId::new(1), &entry).await;
        assert_eq!(
            platform.sent(),
            vec![Sent::Entry {
                channel: ChannelId::new(99),
                entry
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_delivery_is_swallowed() {
        let (_dir, store) = test_store();
        store
            .log_channels
            .update(|c| c.set(GuildId::new(1), ChannelId::new(99)));
        let platform = RecordingPlatform::new()
            .with_channel(ChannelId::new(99))
            .failing_sends();

        send_log(&platform, &store, GuildId::new(1), &LogEntry::new("x", EntryColor::Info)).await;
        assert!(platform.sent().is_empty());
    }
}

//! Casual chat participation in channels that opted in.

use crate::config::ChatConfig;
use crate::core::command::IncomingMessage;
use crate::core::keywords;
use poise::serenity_prelude::ChannelId;
use rand::Rng;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;

/// Chat settings of one channel. Lives only as long as the process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatChannelState {
    /// Whether the bot joins conversations here
    pub enabled: bool,
    /// Optional topic steering unmatched messages
    pub topic: Option<String>,
}

/// Chat settings for every channel that has any.
#[derive(Debug, Default)]
pub struct ChatChannels {
    channels: RwLock<HashMap<ChannelId, ChatChannelState>>,
}

impl ChatChannels {
    /// Creates an empty set; chatting is off everywhere.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns chatting on, replacing the topic.
    pub fn enable(&self, channel_id: ChannelId, topic: Option<String>) {
        self.write().insert(
            channel_id,
            ChatChannelState {
                enabled: true,
                topic,
            },
        );
    }

    /// Turns chatting off. Returns whether it was on.
    pub fn disable(&self, channel_id: ChannelId) -> bool {
        self.write()
            .get_mut(&channel_id)
            .is_some_and(|state| std::mem::replace(&mut state.enabled, false))
    }

    /// Replaces the topic without touching the enabled flag.
    pub fn set_topic(&self, channel_id: ChannelId, topic: Option<String>) {
        self.write().entry(channel_id).or_default().topic = topic;
    }

    /// Current settings of a channel.
    #[must_use]
    pub fn get(&self, channel_id: ChannelId) -> Option<ChatChannelState> {
        self.channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&channel_id)
            .cloned()
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ChannelId, ChatChannelState>> {
        self.channels.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A reply the bot intends to send after a simulated typing delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReply {
    /// Reply text
    pub text: &'static str,
    /// How long to wait before sending
    pub delay: Duration,
}

/// Decides whether and how to answer a non-command message.
#[derive(Debug, Clone)]
pub struct ChatResponder {
    reply_chance: f64,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl ChatResponder {
    /// Builds a responder from the chat settings.
    #[must_use]
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            reply_chance: config.reply_chance,
            min_delay_ms: config.min_delay_ms.min(config.max_delay_ms),
            max_delay_ms: config.max_delay_ms,
        }
    }

    /// Plans a reply to `message`, or `None` if the bot stays quiet.
    ///
    /// Bots, direct messages, prefixed messages and channels without chatting
    /// enabled are ignored; otherwise the bot joins in with the configured
    /// probability.
    pub fn plan<R: Rng + ?Sized>(
        &self,
        message: &IncomingMessage,
        prefix: &str,
        channels: &ChatChannels,
        rng: &mut R,
    ) -> Option<PlannedReply> {
        if message.author.bot || message.guild_id.is_none() || message.content.starts_with(prefix)
        {
            return None;
        }

        let state = channels
            .get(message.channel_id)
            .filter(|state| state.enabled)?;

        if rng.r#gen::<f64>() >= self.reply_chance {
            return None;
        }

        let text = keywords::respond(&message.content, state.topic.as_deref(), rng);
        let delay_ms = rng.gen_range(self.min_delay_ms..=self.max_delay_ms);
        Some(PlannedReply {
            text,
            delay: Duration::from_millis(delay_ms),
        })
    }
}

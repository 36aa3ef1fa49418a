//! Turns casual chat participation on and off per channel.

use super::utils::reply_usage;
use crate::core::command::{Command, CommandContext};
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude::Permissions;

/// `chat on [topic]`, `chat off`, `chat topic [text]`, `chat status`.
pub struct Chat;

fn topic_from(args: &[String]) -> Option<String> {
    let topic = args.join(" ");
    let topic = topic.trim();
    (!topic.is_empty() && !topic.eq_ignore_ascii_case("clear")).then(|| topic.to_string())
}

#[async_trait]
impl Command for Chat {
    fn name(&self) -> &'static str {
        "chat"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["chatting"]
    }

    fn description(&self) -> &'static str {
        "Lets the bot join conversations in this channel"
    }

    fn usage(&self) -> &'static str {
        "<on [topic] | off | topic [text] | status>"
    }

    fn permissions(&self) -> Permissions {
        Permissions::MANAGE_CHANNELS
    }

    fn category(&self) -> &'static str {
        "fun"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let channel_id = ctx.message.channel_id;
        let chat = &ctx.state.chat;
        let rest = args.get(1..).unwrap_or_default();

        match args.first().map(|a| a.to_lowercase()).as_deref() {
            Some("on" | "enable") => {
                let topic = topic_from(rest);
                let text = match &topic {
                    Some(topic) => format!("💬 Chatting enabled here. Topic: **{topic}**"),
                    None => "💬 Chatting enabled here.".to_string(),
                };
                chat.enable(channel_id, topic);
                ctx.reply(text).await
            }
            Some("off" | "disable") => {
                if chat.disable(channel_id) {
                    ctx.reply("🔇 Chatting disabled here.").await
                } else {
                    ctx.reply("Chatting was not enabled here.").await
                }
            }
            Some("topic") => {
                let topic = topic_from(rest);
                let text = match &topic {
                    Some(topic) => format!("Topic set to **{topic}**."),
                    None => "Topic cleared.".to_string(),
                };
                chat.set_topic(channel_id, topic);
                ctx.reply(text).await
            }
            Some("status") => {
                let state = chat.get(channel_id).unwrap_or_default();
                let enabled = if state.enabled { "enabled" } else { "disabled" };
                let topic = state.topic.as_deref().unwrap_or("none");
                ctx.reply(format!("Chatting is **{enabled}** here. Topic: {topic}"))
                    .await
            }
            _ => reply_usage(ctx, self).await,
        }
    }
}

//! Named custom messages that moderators store and anyone can recall.

use super::utils::reply_usage;
use crate::core::command::{Command, CommandContext};
use crate::core::store::Record;
use crate::errors::Result;
use async_trait::async_trait;
use poise::serenity_prelude::Permissions;

/// Stores a message under a key.
pub struct AddMessage;

#[async_trait]
impl Command for AddMessage {
    fn name(&self) -> &'static str {
        "addmessage"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["addmsg"]
    }

    fn description(&self) -> &'static str {
        "Saves a custom message under a name"
    }

    fn usage(&self) -> &'static str {
        "<name> <text>"
    }

    fn permissions(&self) -> Permissions {
        Permissions::MANAGE_MESSAGES
    }

    fn category(&self) -> &'static str {
        "utility"
    }

    fn mutates(&self) -> &'static [Record] {
        &[Record::Messages]
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let (Some(key), Some(text)) = (args.first(), args.get(1..).filter(|t| !t.is_empty()))
        else {
            return reply_usage(ctx, self).await;
        };
        let key = key.to_lowercase();
        let replaced = ctx
            .state
            .store
            .messages
            .update(|m| m.insert(key.clone(), text.join(" ")))
            .is_some();

        let verb = if replaced { "updated" } else { "saved" };
        ctx.reply(format!(
            "✅ Message `{key}` {verb}. Use `{}message {key}` to show it.",
            ctx.prefix
        ))
        .await
    }
}

/// Shows a stored message, or lists the stored names.
pub struct ShowMessage;

#[async_trait]
impl Command for ShowMessage {
    fn name(&self) -> &'static str {
        "message"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["msg"]
    }

    fn description(&self) -> &'static str {
        "Shows a saved custom message"
    }

    fn usage(&self) -> &'static str {
        "[name]"
    }

    fn category(&self) -> &'static str {
        "utility"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        let messages = &ctx.state.store.messages;
        let Some(key) = args.first().map(|k| k.to_lowercase()) else {
            let keys = messages.read(|m| m.keys());
            return if keys.is_empty() {
                ctx.reply("No custom messages saved yet.").await
            } else {
                ctx.reply(format!("Saved messages: {}", keys.join(", "))).await
            };
        };

        match messages.read(|m| m.get(&key).map(str::to_string)) {
            Some(text) => ctx.say(text).await,
            None => ctx.reply(format!("No message named `{key}`.")).await,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{RecordingPlatform, Sent, TEST_CHANNEL, invoke, test_state};

    #[tokio::test]
    async fn test_add_then_show() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&AddMessage, &state, &platform, "!addmessage Rules Be nice to everyone")
            .await
            .unwrap();
        invoke(&ShowMessage, &state, &platform, "!msg rules")
            .await
            .unwrap();

        assert_eq!(
            platform.sent().last(),
            Some(&Sent::Text {
                channel: TEST_CHANNEL,
                text: "Be nice to everyone".to_string()
            })
        );
    }

    #[tokio::test]
    async fn test_add_requires_text_and_overwrite_is_reported() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&AddMessage, &state, &platform, "!addmessage rules")
            .await
            .unwrap();
        invoke(&AddMessage, &state, &platform, "!addmessage rules one")
            .await
            .unwrap();
        invoke(&AddMessage, &state, &platform, "!addmessage rules two")
            .await
            .unwrap();

        let texts = platform.texts();
        assert_eq!(texts[0], "Usage: `!addmessage <name> <text>`");
        assert!(texts[1].contains("saved"));
        assert!(texts[2].contains("updated"));
    }

    #[tokio::test]
    async fn test_show_lists_and_misses() {
        let (_dir, state) = test_state().await;
        let platform = RecordingPlatform::new();

        invoke(&ShowMessage, &state, &platform, "!message").await.unwrap();
        state
            .store
            .messages
            .update(|m| m.insert("faq".to_string(), "Read the pins".to_string()));
        invoke(&ShowMessage, &state, &platform, "!message").await.unwrap();
        invoke(&ShowMessage, &state, &platform, "!message nope").await.unwrap();

        assert_eq!(
            platform.texts(),
            vec![
                "No custom messages saved yet.".to_string(),
                "Saved messages: faq".to_string(),
                "No message named `nope`.".to_string()
            ]
        );
    }
}

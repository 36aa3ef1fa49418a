//! Questions answered by an external chat completion API.
//!
//! Only registered when an API key is configured.

use super::utils::reply_usage;
use crate::config::AiConfig;
use crate::core::command::{Command, CommandContext};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

/// Discord rejects messages longer than this.
const MAX_MESSAGE_CHARS: usize = 2000;

const SYSTEM_PROMPT: &str =
    "You are a friendly assistant in a Discord server. Keep answers short and conversational.";

#[derive(Debug, Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Forwards a question to the completion endpoint and replies with the answer.
pub struct Ask {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl Ask {
    /// Builds the command, or `None` when no API key is configured.
    #[must_use]
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        let api_key = config.api_key.as_deref()?.trim();
        if api_key.is_empty() {
            return None;
        }
        Some(Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    async fn complete(&self, question: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": self.model,
                "max_tokens": 500,
                "messages": [
                    { "role": "system", "content": SYSTEM_PROMPT },
                    { "role": "user", "content": question }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Completion API returned {}: {}", status, body);
            return Err(Error::Command {
                message: format!("AI service returned {status}"),
            });
        }

        let completion: Completion = response.json().await?;
        completion
            .choices
            .into_iter()
            .find_map(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| Error::Command {
                message: "AI service returned an empty answer".to_string(),
            })
    }
}

/// Cuts `text` to at most `max` characters.
fn truncate_chars(text: &str, max: usize) -> &str {
    text.char_indices()
        .nth(max)
        .map_or(text, |(end, _)| &text[..end])
}

#[async_trait]
impl Command for Ask {
    fn name(&self) -> &'static str {
        "ask"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ai"]
    }

    fn description(&self) -> &'static str {
        "Asks the AI assistant a question"
    }

    fn usage(&self) -> &'static str {
        "<question>"
    }

    fn cooldown(&self) -> u32 {
        10
    }

    fn category(&self) -> &'static str {
        "ai"
    }

    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> Result<()> {
        if args.is_empty() {
            return reply_usage(ctx, self).await;
        }
        let question = args.join(" ");

        if let Err(e) = ctx.platform.broadcast_typing(ctx.message.channel_id).await {
            debug!("Could not show typing indicator: {}", e);
        }
        let answer = self.complete(&question).await?;
        ctx.reply(truncate_chars(&answer, MAX_MESSAGE_CHARS)).await
    }
}

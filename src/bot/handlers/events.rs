//! Gateway event routing.

use crate::bot::BotData;
use crate::bot::platform::SerenityPlatform;
use crate::core::chat::PlannedReply;
use crate::core::command::{IncomingMessage, Invoker};
use crate::core::members::welcome_member;
use crate::core::platform::Platform;
use crate::core::presence::{ServerStatus, activity_text};
use crate::errors::{Error, Result};
use chrono::Utc;
use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, info, warn};

/// Converts a gateway message into the core's view of it.
fn incoming(ctx: &serenity::Context, message: &serenity::Message) -> IncomingMessage {
    let channel_name = message
        .guild_id
        .and_then(|guild_id| {
            ctx.cache.guild(guild_id).and_then(|guild| {
                guild
                    .channels
                    .get(&message.channel_id)
                    .map(|channel| channel.name.clone())
            })
        })
        .unwrap_or_else(|| message.channel_id.to_string());

    IncomingMessage {
        id: message.id,
        content: message.content.clone(),
        author: Invoker {
            id: message.author.id,
            tag: message.author.tag(),
            bot: message.author.bot,
        },
        guild_id: message.guild_id,
        channel_id: message.channel_id,
        channel_name,
    }
}

/// Shows typing now and sends the reply once the planned delay has passed.
async fn schedule_reply(platform: SerenityPlatform, message: &IncomingMessage, reply: PlannedReply) {
    if let Err(e) = platform.broadcast_typing(message.channel_id).await {
        debug!("Could not show typing indicator: {}", e);
    }
    let (channel_id, message_id) = (message.channel_id, message.id);
    tokio::spawn(async move {
        tokio::time::sleep(reply.delay).await;
        if let Err(e) = platform.reply(channel_id, message_id, reply.text).await {
            warn!("Failed to send chat reply in {}: {}", channel_id, e);
        }
    });
}

async fn on_message(ctx: &serenity::Context, message: &serenity::Message, data: &BotData) {
    let platform = SerenityPlatform::new(ctx.clone());
    let state = &data.state;
    let message = incoming(ctx, message);

    if let Some(guild_id) = message.guild_id {
        state.refresh_presence(&platform, guild_id).await;
    }

    let prefix = state.prefix_for(message.guild_id);
    let planned = {
        let mut rng = rand::thread_rng();
        state.responder.plan(&message, &prefix, &state.chat, &mut rng)
    };
    if let Some(reply) = planned {
        schedule_reply(platform.clone(), &message, reply).await;
    }

    let outcome = data
        .dispatcher
        .dispatch(&message, &platform, state, Utc::now())
        .await;
    debug!(?outcome, "Message handled");
}

/// Handles every gateway event the bot subscribes to.
pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<()> {
    let state = &data.state;
    match event {
        FullEvent::Ready { data_about_bot } => {
            info!("Logged in as {}", data_about_bot.user.name);
            SerenityPlatform::new(ctx.clone())
                .set_presence(ServerStatus::Dnd, &activity_text(&state.config.prefix))
                .await;
        }
        FullEvent::GuildCreate { guild, .. } => {
            debug!(guild_id = %guild.id, "Guild available: {}", guild.name);
            state
                .guilds
                .upsert(guild.id, guild.name.clone(), guild.member_count);
            state.guild_joined(guild.id).await;
        }
        FullEvent::GuildDelete { incomplete, .. } => {
            if !incomplete.unavailable {
                info!(guild_id = %incomplete.id, "Removed from guild");
                state.guilds.remove(incomplete.id);
            }
        }
        FullEvent::GuildMemberAddition { new_member } => {
            state.guilds.adjust_members(new_member.guild_id, true);
            let member = Invoker {
                id: new_member.user.id,
                tag: new_member.user.tag(),
                bot: new_member.user.bot,
            };
            let platform = SerenityPlatform::new(ctx.clone());
            let outcome = welcome_member(&platform, state, new_member.guild_id, &member).await;
            debug!(?outcome, "Member join handled");
        }
        FullEvent::GuildMemberRemoval { guild_id, .. } => {
            state.guilds.adjust_members(*guild_id, false);
        }
        FullEvent::InteractionCreate { interaction } => {
            if let Some(guild_id) = interaction.guild_id() {
                state
                    .refresh_presence(&SerenityPlatform::new(ctx.clone()), guild_id)
                    .await;
            }
        }
        FullEvent::Message { new_message } => on_message(ctx, new_message, data).await,
        _ => {}
    }
    Ok(())
}

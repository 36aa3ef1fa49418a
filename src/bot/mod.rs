//! Bot layer - Discord connection, event handlers and prefix commands
//!
//! The poise framework owns the gateway connection and routes events to
//! [`handlers::event_handler`]; prefix commands run through the crate's own
//! [`Dispatcher`], not poise's command system.

/// Prefix command implementations
pub mod commands;
/// Gateway event handlers
pub mod handlers;
/// Serenity-backed platform
pub mod platform;

use crate::core::dispatch::Dispatcher;
use crate::core::state::AppState;
use crate::errors::{Error, Result};
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Shared data available to every event handler.
pub struct BotData {
    /// Application state
    pub state: Arc<AppState>,
    /// Prefix command pipeline
    pub dispatcher: Arc<Dispatcher>,
}

impl BotData {
    /// Creates a new `BotData` over shared state and dispatcher.
    #[must_use]
    pub const fn new(state: Arc<AppState>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { state, dispatcher }
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to set up bot: {}", error);
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!("Error handling {}: {}", event.snake_case_name(), error);
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

fn intents() -> serenity::GatewayIntents {
    serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::MESSAGE_CONTENT
}

/// Builds a client and runs it until the gateway connection ends.
async fn connect_once(
    token: &str,
    state: &Arc<AppState>,
    dispatcher: &Arc<Dispatcher>,
) -> Result<()> {
    let state = Arc::clone(state);
    let dispatcher = Arc::clone(dispatcher);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |_ctx, ready, _framework| {
            Box::pin(async move {
                info!("Connected as {} to {} guilds", ready.user.name, ready.guilds.len());
                Ok(BotData::new(state, dispatcher))
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(token, intents())
        .framework(framework)
        .await?;
    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

/// Runs the bot forever, rebuilding the client after every failure or
/// disconnect with a fixed delay in between.
#[instrument(skip_all)]
pub async fn run_bot(token: String, state: Arc<AppState>, dispatcher: Arc<Dispatcher>) {
    let delay = Duration::from_secs(state.config.reconnect_delay_secs);
    loop {
        match connect_once(&token, &state, &dispatcher).await {
            Ok(()) => warn!("Gateway connection closed"),
            Err(e) => error!("Discord client error: {}", e),
        }
        info!("Attempting to reconnect in {} seconds...", delay.as_secs());
        tokio::time::sleep(delay).await;
    }
}

use cmdo_bot::bot::{self, commands::build_registry};
use cmdo_bot::config::load_app_configuration;
use cmdo_bot::core::dispatch::Dispatcher;
use cmdo_bot::core::state::AppState;
use cmdo_bot::dashboard::{self, DashboardState};
use cmdo_bot::errors::{Error, Result};
use dotenvy::dotenv;
use std::{env, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Tracing first so config problems are visible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. .env is optional, variables may be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Configuration
    let app_config = Arc::new(load_app_configuration()?);

    // 4. Persisted record sets
    let state = Arc::new(AppState::new(Arc::clone(&app_config)));
    state.store.load_all().await;

    // 5. Command registry
    let registry = build_registry(&app_config);
    let command_count = registry.len();
    let dispatcher = Arc::new(Dispatcher::new(registry));

    // 6. Dashboard runs alongside the bot
    let dashboard_state = DashboardState {
        app: Arc::clone(&state),
        command_count,
    };
    tokio::spawn(async move {
        if let Err(e) = dashboard::serve(dashboard_state).await {
            error!("Dashboard stopped: {}", e);
        }
    });

    // 7. Run the bot; the token is read here and never stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, state, dispatcher).await;
    Ok(())
}

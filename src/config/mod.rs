/// Bot, chat, dashboard and AI settings from config.toml and the environment
pub mod settings;

pub use settings::{AiConfig, AppConfig, ChatConfig, DashboardConfig, load_app_configuration};

//! Unified error types for the bot, its persistence layer and the dashboard.

use thiserror::Error;

/// Every failure the crate can surface.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// `config.toml` could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A record set could not be loaded or saved
    #[error("Failed to persist {record}: {message}")]
    Persistence {
        /// File name of the record set
        record: &'static str,
        /// Underlying failure
        message: String,
    },

    /// A command ran but could not complete
    #[error("Command execution error: {message}")]
    Command {
        /// Description of the failure
        message: String,
    },

    /// Serenity/Poise framework failure
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),

    /// Outbound HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Dashboard session store failure
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

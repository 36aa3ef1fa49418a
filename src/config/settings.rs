//! Application settings loaded from `config.toml` and the environment.
//!
//! Every field has a default, so a missing `config.toml` still yields a usable
//! configuration. Environment variables (usually supplied through `.env`) take
//! precedence over the file.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Top-level configuration for the bot and its dashboard.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Global command prefix, used when a guild has no override
    pub prefix: String,
    /// Directory holding the JSON record files
    pub data_dir: PathBuf,
    /// Seconds to wait before restarting the gateway client after a failure
    pub reconnect_delay_secs: u64,
    /// Casual chat responder tuning
    pub chat: ChatConfig,
    /// Web dashboard settings
    pub dashboard: DashboardConfig,
    /// External AI settings
    pub ai: AiConfig,
}

/// Tuning for the casual chat responder.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Probability in `[0, 1]` that the bot answers an eligible message
    pub reply_chance: f64,
    /// Lower bound of the simulated typing delay
    pub min_delay_ms: u64,
    /// Upper bound of the simulated typing delay
    pub max_delay_ms: u64,
}

/// Web dashboard settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Address the HTTP server binds to
    pub bind: String,
    /// Port the HTTP server listens on
    pub port: u16,
    /// Login name accepted by the dashboard
    pub username: String,
    /// Password accepted by the dashboard
    pub password: String,
}

/// External AI settings. Commands depending on these are only registered
/// when an API key is present.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// API key; never read from `config.toml`, only from `OPENAI_API_KEY`
    #[serde(skip)]
    pub api_key: Option<String>,
    /// Chat completion model name
    pub model: String,
    /// Chat completion endpoint
    pub endpoint: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            data_dir: PathBuf::from("data"),
            reconnect_delay_secs: 5,
            chat: ChatConfig::default(),
            dashboard: DashboardConfig::default(),
            ai: AiConfig::default(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_chance: 0.7,
            min_delay_ms: 500,
            max_delay_ms: 2000,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 5000,
            username: "admin".to_string(),
            password: "admin123".to_string(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
        }
    }
}

impl AppConfig {
    /// Applies environment overrides using `lookup` to resolve variable names.
    ///
    /// Taking the lookup as a parameter keeps this testable without touching
    /// the process environment.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(prefix) = lookup("COMMAND_PREFIX").filter(|p| !p.trim().is_empty()) {
            self.prefix = prefix.trim().to_string();
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(port) = lookup("DASHBOARD_PORT") {
            self.dashboard.port = port.parse().map_err(|e| Error::Config {
                message: format!("DASHBOARD_PORT must be a port number: {e}"),
            })?;
        }
        if let Some(username) = lookup("DASHBOARD_USERNAME") {
            self.dashboard.username = username;
        }
        if let Some(password) = lookup("DASHBOARD_PASSWORD") {
            self.dashboard.password = password;
        }
        self.ai.api_key = lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty());
        Ok(())
    }

    /// Rejects values that would make the bot misbehave at runtime.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() || self.prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config {
                message: format!("Invalid command prefix {:?}", self.prefix),
            });
        }
        if !(0.0..=1.0).contains(&self.chat.reply_chance) {
            return Err(Error::Config {
                message: format!(
                    "chat.reply_chance must be within [0, 1], got {}",
                    self.chat.reply_chance
                ),
            });
        }
        if self.chat.min_delay_ms > self.chat.max_delay_ms {
            return Err(Error::Config {
                message: "chat.min_delay_ms must not exceed chat.max_delay_ms".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses a TOML configuration file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    Ok(toml::from_str(&contents)?)
}

/// Loads `./config.toml` if it exists, falls back to defaults otherwise, then
/// applies environment overrides and validates the result.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = Path::new("config.toml");
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        info!("No config.toml found, using default settings.");
        AppConfig::default()
    };
    config.apply_overrides(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_partial_config_keeps_defaults() {
        let toml_str = r#"
            prefix = "?"

            [chat]
            reply_chance = 0.25

            [dashboard]
            port = 8080
        "#;

        let config: AppConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.prefix, "?");
        assert_eq!(config.chat.reply_chance, 0.25);
        assert_eq!(config.chat.min_delay_ms, 500);
        assert_eq!(config.dashboard.port, 8080);
        assert_eq!(config.dashboard.username, "admin");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_env_overrides_take_precedence() {
        let env: HashMap<&str, &str> = [
            ("COMMAND_PREFIX", "$"),
            ("DASHBOARD_PORT", "9000"),
            ("OPENAI_API_KEY", "sk-test"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| (*v).to_string()))
            .unwrap();

        assert_eq!(config.prefix, "$");
        assert_eq!(config.dashboard.port, 9000);
        assert_eq!(config.ai.api_key.as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_blank_api_key_disables_ai() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(|key| (key == "OPENAI_API_KEY").then(|| "  ".to_string()))
            .unwrap();
        assert!(config.ai.api_key.is_none());
    }

    #[test]
    fn test_bad_port_is_config_error() {
        let mut config = AppConfig::default();
        let result =
            config.apply_overrides(|key| (key == "DASHBOARD_PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.prefix = "a b".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.chat.reply_chance = 1.5;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.chat.min_delay_ms = 3000;
        assert!(config.validate().is_err());
    }
}

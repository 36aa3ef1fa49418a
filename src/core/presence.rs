//! Per-guild presence status.

use poise::serenity_prelude::OnlineStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Presence a guild has asked the bot to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Green dot
    #[default]
    Online,
    /// Moon
    #[serde(alias = "away")]
    Idle,
    /// Do not disturb
    #[serde(alias = "busy")]
    Dnd,
    /// Shown to Discord as invisible
    #[serde(alias = "invisible")]
    Offline,
}

impl ServerStatus {
    /// All statuses, in the order they are offered to users.
    pub const ALL: [Self; 4] = [Self::Online, Self::Idle, Self::Dnd, Self::Offline];

    /// Lowercase name as stored on disk.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Idle => "idle",
            Self::Dnd => "dnd",
            Self::Offline => "offline",
        }
    }

    /// Gateway status to present. A bot cannot be "offline" while connected,
    /// so offline maps to invisible.
    #[must_use]
    pub const fn online_status(self) -> OnlineStatus {
        match self {
            Self::Online => OnlineStatus::Online,
            Self::Idle => OnlineStatus::Idle,
            Self::Dnd => OnlineStatus::DoNotDisturb,
            Self::Offline => OnlineStatus::Invisible,
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "online" => Ok(Self::Online),
            "idle" | "away" => Ok(Self::Idle),
            "dnd" | "busy" => Ok(Self::Dnd),
            "offline" | "invisible" => Ok(Self::Offline),
            other => Err(format!("unknown status '{other}'")),
        }
    }
}

/// Activity text shown under the bot's name.
#[must_use]
pub fn activity_text(prefix: &str) -> String {
    format!("{prefix}help✅")
}

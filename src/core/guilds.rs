//! In-process view of the guilds the bot is in, fed by gateway events and
//! read by the dashboard.

use poise::serenity_prelude::GuildId;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

/// Name and size of one guild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildSummary {
    /// Snowflake as a string, since it does not fit a JavaScript number
    pub id: String,
    /// Guild name
    pub name: String,
    /// Member count as last reported
    pub member_count: u64,
}

#[derive(Debug, Clone)]
struct GuildInfo {
    name: String,
    member_count: u64,
}

/// Guilds currently joined.
#[derive(Debug, Default)]
pub struct GuildDirectory {
    guilds: RwLock<BTreeMap<GuildId, GuildInfo>>,
}

impl GuildDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a guild or refreshes its name and size.
    pub fn upsert(&self, guild_id: GuildId, name: impl Into<String>, member_count: u64) {
        self.guilds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                guild_id,
                GuildInfo {
                    name: name.into(),
                    member_count,
                },
            );
    }

    /// Forgets a guild the bot left.
    pub fn remove(&self, guild_id: GuildId) {
        self.guilds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&guild_id);
    }

    /// Adjusts a guild's member count by one in either direction.
    pub fn adjust_members(&self, guild_id: GuildId, joined: bool) {
        if let Some(info) = self
            .guilds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&guild_id)
        {
            info.member_count = if joined {
                info.member_count.saturating_add(1)
            } else {
                info.member_count.saturating_sub(1)
            };
        }
    }

    /// Number of guilds.
    #[must_use]
    pub fn guild_count(&self) -> usize {
        self.guilds.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Sum of member counts across guilds.
    #[must_use]
    pub fn member_total(&self) -> u64 {
        self.guilds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|g| g.member_count)
            .sum()
    }

    /// All guilds, ordered by id.
    #[must_use]
    pub fn summaries(&self) -> Vec<GuildSummary> {
        self.guilds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, info)| GuildSummary {
                id: id.to_string(),
                name: info.name.clone(),
                member_count: info.member_count,
            })
            .collect()
    }
}

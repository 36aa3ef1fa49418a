//! JSON-backed record sets.
//!
//! Each record set lives in one file under the data directory and is held in
//! memory as a whole. Loading replaces the in-memory value wholesale; saving
//! writes a full snapshot to a temporary file and renames it over the old one.
//! Saves of the same record set are serialized through an async mutex so two
//! writers never interleave.

use crate::core::presence::ServerStatus;
use crate::errors::{Error, Result};
use poise::serenity_prelude::{ChannelId, GuildId, RoleId};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Key the auto-role map falls back to when a guild has no entry of its own.
pub const DEFAULT_ROLE_KEY: &str = "DEFAULT_ROLE_ID";

/// A value that is persisted as one JSON file.
pub trait RecordFile: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// File name inside the data directory
    const FILE_NAME: &'static str;
}

/// What happened when a record set was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was read and parsed
    Loaded,
    /// There was no file; the set starts empty
    Missing,
    /// The file could not be read or parsed; the set starts empty
    Invalid,
}

/// One persisted record set and its in-memory copy.
#[derive(Debug)]
pub struct RecordSet<T> {
    path: PathBuf,
    data: RwLock<T>,
    write_lock: Mutex<()>,
}

impl<T: RecordFile> RecordSet<T> {
    /// Creates an empty set backed by `dir/FILE_NAME`. Nothing is read yet.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(T::FILE_NAME),
            data: RwLock::new(T::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Runs `f` against the in-memory value.
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let guard = self.data.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    /// Runs `f` against the in-memory value mutably. Does not save.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.data.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn replace(&self, value: T) {
        self.update(|data| *data = value);
    }

    /// Replaces the in-memory value with the file's contents. Never fails:
    /// a missing or unreadable file leaves the set empty and is logged.
    pub async fn load(&self) -> LoadOutcome {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => match serde_json::from_str::<T>(&contents) {
                Ok(value) => {
                    self.replace(value);
                    info!("{} loaded successfully", T::FILE_NAME);
                    LoadOutcome::Loaded
                }
                Err(e) => {
                    error!("Error parsing {}: {}", self.path.display(), e);
                    self.replace(T::default());
                    LoadOutcome::Invalid
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("{} not found, starting empty", self.path.display());
                self.replace(T::default());
                LoadOutcome::Missing
            }
            Err(e) => {
                error!("Error reading {}: {}", self.path.display(), e);
                self.replace(T::default());
                LoadOutcome::Invalid
            }
        }
    }

    /// Writes a full snapshot of the in-memory value.
    ///
    /// The snapshot is taken after acquiring the write lock, so the last
    /// save to finish always carries the latest state.
    pub async fn save(&self) -> Result<()> {
        let _writer = self.write_lock.lock().await;
        let json = self.read(|data| serde_json::to_string_pretty(data))?;
        write_atomic(&self.path, json)
            .await
            .map_err(|e| Error::Persistence {
                record: T::FILE_NAME,
                message: e.to_string(),
            })?;
        debug!("{} saved successfully", T::FILE_NAME);
        Ok(())
    }

    /// Writes the default value if the backing file does not exist yet.
    /// Returns whether a file was created.
    pub async fn create_if_missing(&self) -> Result<bool> {
        if tokio::fs::try_exists(&self.path).await? {
            return Ok(false);
        }
        self.save().await?;
        Ok(true)
    }
}

async fn write_atomic(path: &Path, contents: String) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, contents).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Parses a Discord snowflake stored as a string. Zero is not a valid id.
pub(crate) fn parse_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

/// Role handed to new members, keyed by guild id (or [`DEFAULT_ROLE_KEY`]).
///
/// On disk: `{ "<key>": "<roleId>" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AutoRoles(BTreeMap<String, String>);

impl RecordFile for AutoRoles {
    const FILE_NAME: &'static str = "autoroles.json";
}

impl AutoRoles {
    /// Role for `guild_id`, falling back to the global default entry.
    #[must_use]
    pub fn role_for(&self, guild_id: GuildId) -> Option<RoleId> {
        self.0
            .get(&guild_id.to_string())
            .or_else(|| self.0.get(DEFAULT_ROLE_KEY))
            .and_then(|raw| parse_id(raw))
            .map(RoleId::new)
    }

    /// Sets the role for a guild.
    pub fn set(&mut self, guild_id: GuildId, role_id: RoleId) {
        self.0.insert(guild_id.to_string(), role_id.to_string());
    }

    /// Removes a guild's own entry. Returns whether one existed.
    pub fn clear(&mut self, guild_id: GuildId) -> bool {
        self.0.remove(&guild_id.to_string()).is_some()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Presence status per guild.
///
/// On disk: `{ "servers": { "<guildId>": "<status>" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatuses {
    #[serde(default, deserialize_with = "lenient_statuses")]
    servers: BTreeMap<String, ServerStatus>,
}

/// Reads the status map entry by entry, dropping values that are not a known
/// status instead of rejecting the whole file.
fn lenient_statuses<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, ServerStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|(guild, value)| {
            match value.as_str().map(str::parse::<ServerStatus>) {
                Some(Ok(status)) => Some((guild, status)),
                _ => {
                    warn!("Skipping unknown status {} for guild {}", value, guild);
                    None
                }
            }
        })
        .collect())
}

impl RecordFile for ServerStatuses {
    const FILE_NAME: &'static str = "serverstatus.json";
}

impl ServerStatuses {
    /// Status for a guild; unknown guilds are online.
    #[must_use]
    pub fn status_for(&self, guild_id: GuildId) -> ServerStatus {
        self.servers
            .get(&guild_id.to_string())
            .copied()
            .unwrap_or_default()
    }

    /// Whether the guild has an explicit entry.
    #[must_use]
    pub fn contains(&self, guild_id: GuildId) -> bool {
        self.servers.contains_key(&guild_id.to_string())
    }

    /// Sets a guild's status.
    pub fn set(&mut self, guild_id: GuildId, status: ServerStatus) {
        self.servers.insert(guild_id.to_string(), status);
    }

    /// Records `online` for a guild seen for the first time.
    /// Returns whether an entry was added.
    pub fn insert_default(&mut self, guild_id: GuildId) -> bool {
        if self.contains(guild_id) {
            return false;
        }
        self.set(guild_id, ServerStatus::Online);
        true
    }
}

/// Named custom messages.
///
/// On disk: `{ "addedMessages": { "<key>": "<text>" } }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomMessages {
    #[serde(rename = "addedMessages", default)]
    added_messages: BTreeMap<String, String>,
}

impl RecordFile for CustomMessages {
    const FILE_NAME: &'static str = "messages.json";
}

impl CustomMessages {
    /// Text stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.added_messages.get(key).map(String::as_str)
    }

    /// Stores `text` under `key`, returning the previous text.
    pub fn insert(&mut self, key: String, text: String) -> Option<String> {
        self.added_messages.insert(key, text)
    }

    /// Removes `key`, returning its text.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.added_messages.remove(key)
    }

    /// Stored keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.added_messages.keys().cloned().collect()
    }
}

/// Placeholder for invite tracking. Only ever created, never consumed.
///
/// On disk: `{ "invites": {} }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invites {
    #[serde(default)]
    invites: serde_json::Map<String, serde_json::Value>,
}

impl RecordFile for Invites {
    const FILE_NAME: &'static str = "invites.json";
}

/// Channel receiving audit entries, per guild.
///
/// On disk: `{ "<guildId>": "<channelId>" }`. The older
/// `{ "channels": { ... } }` layout is still accepted when loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LogChannelsFile")]
pub struct LogChannels(BTreeMap<String, String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum LogChannelsFile {
    Wrapped { channels: BTreeMap<String, String> },
    Flat(BTreeMap<String, String>),
}

impl From<LogChannelsFile> for LogChannels {
    fn from(file: LogChannelsFile) -> Self {
        match file {
            LogChannelsFile::Wrapped { channels } | LogChannelsFile::Flat(channels) => {
                Self(channels)
            }
        }
    }
}

impl RecordFile for LogChannels {
    const FILE_NAME: &'static str = "logs.json";
}

impl LogChannels {
    /// Log channel for a guild.
    #[must_use]
    pub fn channel_for(&self, guild_id: GuildId) -> Option<ChannelId> {
        self.0
            .get(&guild_id.to_string())
            .and_then(|raw| parse_id(raw))
            .map(ChannelId::new)
    }

    /// Sets a guild's log channel.
    pub fn set(&mut self, guild_id: GuildId, channel_id: ChannelId) {
        self.0.insert(guild_id.to_string(), channel_id.to_string());
    }

    /// Stops logging for a guild. Returns whether it was configured.
    pub fn remove(&mut self, guild_id: GuildId) -> bool {
        self.0.remove(&guild_id.to_string()).is_some()
    }
}

/// Command prefix overrides per guild.
///
/// On disk: `{ "<guildId>": "<prefix>" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prefixes(BTreeMap<String, String>);

impl RecordFile for Prefixes {
    const FILE_NAME: &'static str = "prefixes.json";
}

impl Prefixes {
    /// Override for a guild, if any.
    #[must_use]
    pub fn prefix_for(&self, guild_id: GuildId) -> Option<String> {
        self.0.get(&guild_id.to_string()).cloned()
    }

    /// Sets a guild's prefix.
    pub fn set(&mut self, guild_id: GuildId, prefix: String) {
        self.0.insert(guild_id.to_string(), prefix);
    }

    /// Drops a guild's override. Returns whether it had one.
    pub fn clear(&mut self, guild_id: GuildId) -> bool {
        self.0.remove(&guild_id.to_string()).is_some()
    }
}

/// Names a record set, so commands can declare what they mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// `autoroles.json`
    AutoRoles,
    /// `serverstatus.json`
    ServerStatuses,
    /// `messages.json`
    Messages,
    /// `logs.json`
    LogChannels,
    /// `prefixes.json`
    Prefixes,
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AutoRoles => AutoRoles::FILE_NAME,
            Self::ServerStatuses => ServerStatuses::FILE_NAME,
            Self::Messages => CustomMessages::FILE_NAME,
            Self::LogChannels => LogChannels::FILE_NAME,
            Self::Prefixes => Prefixes::FILE_NAME,
        };
        f.write_str(name)
    }
}

/// All persisted record sets. The store is the only writer of their files.
#[derive(Debug)]
pub struct StateStore {
    /// Auto-role per guild
    pub auto_roles: RecordSet<AutoRoles>,
    /// Presence status per guild
    pub server_statuses: RecordSet<ServerStatuses>,
    /// Custom messages
    pub messages: RecordSet<CustomMessages>,
    /// Invite tracking placeholder
    pub invites: RecordSet<Invites>,
    /// Audit log channel per guild
    pub log_channels: RecordSet<LogChannels>,
    /// Prefix override per guild
    pub prefixes: RecordSet<Prefixes>,
}

impl StateStore {
    /// Creates empty record sets under `dir`. Call [`Self::load_all`] to read them.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            auto_roles: RecordSet::new(dir),
            server_statuses: RecordSet::new(dir),
            messages: RecordSet::new(dir),
            invites: RecordSet::new(dir),
            log_channels: RecordSet::new(dir),
            prefixes: RecordSet::new(dir),
        }
    }

    /// Loads every record set and creates the invites file if needed.
    pub async fn load_all(&self) {
        self.messages.load().await;
        match self.invites.create_if_missing().await {
            Ok(_) => info!("Invites system initialized"),
            Err(e) => error!("Error initializing invites: {}", e),
        }
        self.auto_roles.load().await;
        self.server_statuses.load().await;
        self.log_channels.load().await;
        self.prefixes.load().await;
    }

    /// Saves one record set, logging instead of returning failures.
    /// The in-memory state stays authoritative until the next successful save.
    pub async fn flush(&self, record: Record) {
        let result = match record {
            Record::AutoRoles => self.auto_roles.save().await,
            Record::ServerStatuses => self.server_statuses.save().await,
            Record::Messages => self.messages.save().await,
            Record::LogChannels => self.log_channels.save().await,
            Record::Prefixes => self.prefixes.save().await,
        };
        if let Err(e) = result {
            error!("Error saving {}: {}", record, e);
        }
    }
}

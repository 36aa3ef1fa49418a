//! Framework-independent bot logic.
//!
//! Nothing in here talks to Discord directly; the gateway side is reached
//! through [`platform::Platform`].

/// Audit log entries and their delivery
pub mod audit;
/// Casual chat participation
pub mod chat;
/// Command capability, context and registry
pub mod command;
/// Per-command, per-user cooldowns
pub mod cooldown;
/// Prefix command pipeline
pub mod dispatch;
/// Joined guilds and their member counts
pub mod guilds;
/// Keyword-to-response matching
pub mod keywords;
/// New member handling
pub mod members;
/// Chat platform abstraction
pub mod platform;
/// Presence status per guild
pub mod presence;
/// Shared application state
pub mod state;
/// JSON-backed record sets
pub mod store;

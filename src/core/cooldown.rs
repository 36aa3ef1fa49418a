//! Per-command, per-invoker cooldown tracking.
//!
//! The check and the record happen under one synchronous lock with no await in
//! between, so two rapid invocations from the same user cannot both pass.

use chrono::{DateTime, Duration, Utc};
use poise::serenity_prelude::UserId;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Cooldown applied to commands that do not declare one.
pub const DEFAULT_COOLDOWN_SECS: u32 = 3;

/// Outcome of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CooldownStatus {
    /// The invocation may proceed; its timestamp has been recorded
    Allowed,
    /// The invocation is too soon; nothing was recorded
    Blocked {
        /// Seconds left in the window, rounded to one decimal
        remaining_secs: f64,
    },
}

impl CooldownStatus {
    /// Whether the invocation may proceed.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Last accepted invocation time per command, per invoker.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    timestamps: Mutex<HashMap<String, HashMap<UserId, DateTime<Utc>>>>,
}

impl CooldownTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks whether `invoker` may run `command` at `now` and records `now`
    /// if so. A blocked attempt leaves the stored timestamp untouched.
    ///
    /// Entries whose window has elapsed are dropped on the way.
    pub fn check_and_record(
        &self,
        command: &str,
        invoker: UserId,
        cooldown_secs: u32,
        now: DateTime<Utc>,
    ) -> CooldownStatus {
        let window = Duration::seconds(i64::from(cooldown_secs));
        let mut timestamps = self
            .timestamps
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let users = timestamps.entry(command.to_string()).or_default();
        users.retain(|_, last| now < *last + window);

        if let Some(last) = users.get(&invoker) {
            let expires_at = *last + window;
            if now < expires_at {
                let remaining_ms = (expires_at - now).num_milliseconds();
                #[allow(clippy::cast_precision_loss)]
                let remaining_secs = (remaining_ms as f64 / 100.0).round() / 10.0;
                trace!(command, %invoker, remaining_secs, "Cooldown active");
                return CooldownStatus::Blocked { remaining_secs };
            }
        }

        users.insert(invoker, now);
        CooldownStatus::Allowed
    }

    /// Number of live timestamps held for `command`.
    #[must_use]
    pub fn tracked(&self, command: &str) -> usize {
        self.timestamps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(command)
            .map_or(0, HashMap::len)
    }

    /// Timestamp currently stored for `(command, invoker)`, if any.
    #[must_use]
    pub fn last_used(&self, command: &str, invoker: UserId) -> Option<DateTime<Utc>> {
        self.timestamps
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(command)
            .and_then(|users| users.get(&invoker).copied())
    }
}

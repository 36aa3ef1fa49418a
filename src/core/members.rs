//! New member handling: auto-role assignment, welcome message and audit entry.

use crate::core::audit::{self, EntryColor, LogEntry};
use crate::core::command::Invoker;
use crate::core::platform::Platform;
use crate::core::state::AppState;
use poise::serenity_prelude::{GuildId, RoleId};
use tracing::{error, info};

/// Result of handling one member join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// No auto-role configured for the guild
    NoAutoRole,
    /// The configured role does not exist in the guild
    RoleMissing(RoleId),
    /// The role was given to the member
    Assigned(RoleId),
    /// The platform refused the assignment
    AssignFailed(RoleId),
}

/// Gives the configured auto-role to a new member, then greets them in the
/// system channel and records the join in the audit log.
pub async fn welcome_member(
    platform: &dyn Platform,
    state: &AppState,
    guild_id: GuildId,
    member: &Invoker,
) -> JoinOutcome {
    let Some(role_id) = state.store.auto_roles.read(|roles| roles.role_for(guild_id)) else {
        info!(%guild_id, "No auto-role configured");
        return JoinOutcome::NoAutoRole;
    };

    let Some(role_name) = platform.role_name(guild_id, role_id).await else {
        error!(%guild_id, %role_id, "Auto-role not found in guild");
        return JoinOutcome::RoleMissing(role_id);
    };

    if let Err(e) = platform.assign_role(guild_id, member.id, role_id).await {
        error!("Error assigning auto-role: {}", e);
        return JoinOutcome::AssignFailed(role_id);
    }
    info!("Assigned role {} to {}", role_name, member.tag);

    if let Some(channel_id) = platform.system_channel(guild_id).await {
        let welcome = LogEntry::new("👋 Welcome!", EntryColor::Success)
            .description(format!(
                "Welcome <@{}> to the server! You've been given the **{}** role.",
                member.id, role_name
            ));
        if let Err(e) = platform.send_entry(channel_id, &welcome).await {
            error!("Error sending welcome message: {}", e);
        }
    }

    let entry = LogEntry::new("👋 Member Joined", EntryColor::Success)
        .description(format!("**{}** has joined the server", member.tag))
        .field("Auto-role", role_name)
        .field("Member ID", member.id.to_string());
    audit::send_log(platform, &state.store, guild_id, &entry).await;

    JoinOutcome::Assigned(role_id)
}

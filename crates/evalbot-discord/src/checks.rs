//! Where and by whom `eval` may be used.

use evalbot_core::config::DiscordConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckFailure {
    /// Invoked from a DM.
    NoPrivateMessage,
    /// Invoked outside the eval channels without a bypass role.
    NotInChannel { channels: Vec<u64> },
}

impl CheckFailure {
    pub fn description(&self) -> String {
        match self {
            CheckFailure::NoPrivateMessage => {
                "You're not allowed to use this command in private messages.".to_string()
            }
            CheckFailure::NotInChannel { channels } => {
                let list = channels
                    .iter()
                    .map(|id| format!("<#{id}>"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Sorry, but you may only use this command within {list}.")
            }
        }
    }
}

/// Guild-only, then the channel whitelist (skipped for bypass roles).
pub fn check_eval_allowed(
    config: &DiscordConfig,
    in_guild: bool,
    channel_id: u64,
    roles: &[u64],
) -> Result<(), CheckFailure> {
    if !in_guild {
        return Err(CheckFailure::NoPrivateMessage);
    }
    if config.eval_channels.is_empty() || config.eval_channels.contains(&channel_id) {
        return Ok(());
    }
    if roles.iter().any(|r| config.bypass_roles.contains(r)) {
        tracing::debug!(channel_id, "eval outside whitelisted channels allowed by bypass role");
        return Ok(());
    }
    Err(CheckFailure::NotInChannel {
        channels: config.eval_channels.clone(),
    })
}

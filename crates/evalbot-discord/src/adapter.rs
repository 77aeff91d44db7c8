use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serenity::model::gateway::GatewayIntents;
use serenity::Client;
use tracing::{error, info, warn};

use evalbot_core::config::DiscordConfig;
use evalbot_eval::Evaluator;

use crate::error::DiscordError;
use crate::handler::EvalHandler;

/// Discord channel adapter.
///
/// Wraps a serenity `Client` and drives the event loop until the process exits.
/// Reconnects automatically whenever the gateway drops.
pub struct DiscordAdapter {
    evaluator: Arc<Evaluator>,
    config: DiscordConfig,
}

impl DiscordAdapter {
    pub fn new(config: &DiscordConfig, evaluator: Arc<Evaluator>) -> Result<Self, DiscordError> {
        if config.bot_token.trim().is_empty() {
            return Err(DiscordError::NoToken);
        }
        Ok(Self {
            evaluator,
            config: config.clone(),
        })
    }

    /// Connect to Discord and keep reconnecting whenever the gateway drops.
    ///
    /// Never returns; runs for the lifetime of the process.
    pub async fn run(self) {
        let intents = GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        loop {
            let mut client = loop {
                match self.build_client(intents).await {
                    Ok(c) => break c,
                    Err(e) => {
                        error!("Discord: connect failed ({e}), retrying in 30s");
                        tokio::time::sleep(Duration::from_secs(30)).await;
                    }
                }
            };

            info!("Discord: gateway connecting");

            if let Err(e) = client.start().await {
                warn!("Discord: gateway error ({e}), reconnecting in 5s");
            } else {
                info!("Discord: gateway stopped cleanly, reconnecting in 5s");
            }

            tokio::time::sleep(Duration::from_secs(5)).await;
        }
    }

    /// Build a fresh serenity `Client` with our event handler.
    async fn build_client(&self, intents: GatewayIntents) -> Result<Client, DiscordError> {
        let handler = EvalHandler {
            evaluator: Arc::clone(&self.evaluator),
            config: self.config.clone(),
            bot_id: OnceLock::new(),
        };

        Ok(Client::builder(&self.config.bot_token, intents)
            .event_handler(handler)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evalbot_core::EvalbotConfig;

    fn config(token: &str) -> DiscordConfig {
        DiscordConfig {
            bot_token: token.to_string(),
            prefixes: vec![],
            eval_channels: vec![],
            bypass_roles: vec![],
            slash_commands: false,
            activity_name: None,
        }
    }

    #[test]
    fn blank_token_is_rejected() {
        let evaluator = Arc::new(Evaluator::from_config(&EvalbotConfig::default()).unwrap());
        assert!(matches!(
            DiscordAdapter::new(&config("  "), Arc::clone(&evaluator)),
            Err(DiscordError::NoToken)
        ));
        assert!(DiscordAdapter::new(&config("token"), evaluator).is_ok());
    }
}

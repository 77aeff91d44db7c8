use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use evalbot_core::EvalbotConfig;
use evalbot_discord::DiscordAdapter;
use evalbot_eval::Evaluator;

/// Discord bot that runs code snippets in a remote sandbox.
#[derive(Debug, Parser)]
#[command(name = "evalbot", version)]
struct Args {
    /// Config file (default: ~/.evalbot/evalbot.toml).
    #[arg(short, long, env = "EVALBOT_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "evalbot=info,evalbot_eval=info,evalbot_discord=info".into()
            }),
        )
        .init();

    let args = Args::parse();
    let config = EvalbotConfig::load(args.config.as_deref())?;

    let evaluator = Arc::new(Evaluator::from_config(&config)?);
    info!(
        snekbox = %config.services.snekbox_url,
        paste = %config.services.paste_url,
        "evaluator ready"
    );

    let Some(ref discord_cfg) = config.discord else {
        warn!("no [discord] section configured, nothing to run");
        return Ok(());
    };

    let adapter = DiscordAdapter::new(discord_cfg, evaluator)?;
    info!("Discord bot starting");
    adapter.run().await;

    Ok(())
}

use std::sync::{Arc, OnceLock};

use serenity::all::ActivityData;
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::UserId;
use serenity::prelude::{Context, EventHandler};
use tracing::{info, warn};

use evalbot_core::config::DiscordConfig;
use evalbot_eval::Evaluator;

use crate::eval::{self, EvalRequest, Reply};
use crate::prefix::parse_eval_invocation;
use crate::send;

/// Serenity event handler wired to the evaluator.
pub struct EvalHandler {
    pub evaluator: Arc<Evaluator>,
    pub config: DiscordConfig,
    pub bot_id: OnceLock<UserId>,
}

#[async_trait]
impl EventHandler for EvalHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        self.bot_id.set(ready.user.id).ok();

        if let Some(ref name) = self.config.activity_name {
            ctx.set_activity(Some(ActivityData::playing(name)));
        }

        info!(name = %ready.user.name, "Discord bot connected");

        if self.config.slash_commands {
            crate::commands::register_commands(&ctx).await;
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let bot_id = self.bot_id.get().map(|id| id.get());
        let Some(code) = parse_eval_invocation(&msg.content, &self.config.prefixes, bot_id)
        else {
            return;
        };

        let roles: Vec<u64> = msg
            .member
            .as_ref()
            .map(|m| m.roles.iter().map(|r| r.get()).collect())
            .unwrap_or_default();

        let req = EvalRequest {
            author: msg.author.id,
            author_name: msg.author.name.clone(),
            channel_id: msg.channel_id,
            in_guild: msg.guild_id.is_some(),
            roles,
            code: code.to_string(),
            seed: msg.id.get(),
        };

        let guard = match eval::admit(&self.evaluator, &self.config, &req) {
            Ok(guard) => guard,
            Err(reply) => {
                deliver(&ctx.http, &req, reply).await;
                return;
            }
        };

        let evaluator = Arc::clone(&self.evaluator);
        let http = Arc::clone(&ctx.http);

        tokio::spawn(async move {
            // Typing stops when the handle is dropped.
            let typing = req.channel_id.start_typing(&http);
            let reply = eval::run(&evaluator, &req, guard).await;
            typing.stop();
            deliver(&http, &req, reply).await;
        });
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        if !self.config.slash_commands {
            return;
        }
        if let Interaction::Command(command) = interaction {
            crate::commands::handle_interaction(&self.evaluator, &self.config, &ctx, &command)
                .await;
        }
    }
}

/// Post `reply` in the request's channel.
async fn deliver(http: &Http, req: &EvalRequest, reply: Reply) {
    let result = match reply {
        Reply::Text(text) => send::send_reply(http, req.channel_id, req.author, &text).await,
        Reply::Error { title, description } => {
            send::send_error(http, req.channel_id, title, &description).await
        }
    };

    if let Err(e) = result {
        warn!(error = %e, channel_id = req.channel_id.get(), "Discord send failed");
    }
}

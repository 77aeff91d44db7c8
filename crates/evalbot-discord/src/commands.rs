//! `/eval` slash command.
//!
//! Registration happens in `ready()` when `config.slash_commands` is true.
//! Interactions are dispatched from `interaction_create` in the event handler.

use serenity::builder::{
    CreateCommand, CreateCommandOption, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::model::application::{Command, CommandInteraction, CommandOptionType};
use serenity::prelude::Context;
use tracing::{info, warn};

use evalbot_core::config::DiscordConfig;
use evalbot_eval::Evaluator;

use crate::eval::{self, EvalRequest, Reply};
use crate::send::{author_only, error_embed};

/// Register the global `/eval` command. Call from `ready()`.
pub async fn register_commands(ctx: &Context) {
    let commands = vec![CreateCommand::new("eval")
        .description("Run some code and get the result back")
        .dm_permission(false)
        .add_option(
            CreateCommandOption::new(CommandOptionType::String, "code", "Code to run")
                .required(true),
        )];

    match Command::set_global_commands(&ctx.http, commands).await {
        Ok(cmds) => info!(count = cmds.len(), "registered global slash commands"),
        Err(e) => warn!(error = %e, "failed to register global slash commands"),
    }
}

/// Dispatch a slash command interaction.
pub async fn handle_interaction(
    evaluator: &Evaluator,
    config: &DiscordConfig,
    ctx: &Context,
    command: &CommandInteraction,
) {
    let result = match command.data.name.as_str() {
        "eval" => handle_eval(evaluator, config, ctx, command).await,
        _ => {
            respond(ctx, command, Reply::Text("Unknown command.".to_string())).await;
            Ok(())
        }
    };

    if let Err(e) = result {
        warn!(command = %command.data.name, error = %e, "slash command error");
    }
}

/// `/eval code:String`
async fn handle_eval(
    evaluator: &Evaluator,
    config: &DiscordConfig,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<(), serenity::Error> {
    let code = command
        .data
        .options
        .iter()
        .find(|o| o.name == "code")
        .and_then(|o| o.value.as_str())
        .unwrap_or("");

    let req = EvalRequest {
        author: command.user.id,
        author_name: command.user.name.clone(),
        channel_id: command.channel_id,
        in_guild: command.guild_id.is_some(),
        roles: command
            .member
            .as_ref()
            .map(|m| m.roles.iter().map(|r| r.get()).collect())
            .unwrap_or_default(),
        code: code.to_string(),
        seed: command.id.get(),
    };

    let guard = match eval::admit(evaluator, config, &req) {
        Ok(guard) => guard,
        Err(reply) => {
            respond(ctx, command, reply).await;
            return Ok(());
        }
    };

    // Defer the response (shows "thinking...").
    command
        .create_response(
            &ctx.http,
            CreateInteractionResponse::Defer(CreateInteractionResponseMessage::new()),
        )
        .await?;

    let edit = match eval::run(evaluator, &req, guard).await {
        Reply::Text(text) => EditInteractionResponse::new()
            .content(text)
            .allowed_mentions(author_only(req.author)),
        Reply::Error { title, description } => {
            EditInteractionResponse::new().embed(error_embed(title, &description))
        }
    };
    command.edit_response(&ctx.http, edit).await?;

    Ok(())
}

/// Immediate reply; errors and notices are only shown to the invoker.
async fn respond(ctx: &Context, command: &CommandInteraction, reply: Reply) {
    let message = match reply {
        Reply::Text(text) => CreateInteractionResponseMessage::new()
            .content(text)
            .allowed_mentions(author_only(command.user.id)),
        Reply::Error { title, description } => {
            CreateInteractionResponseMessage::new().embed(error_embed(title, &description))
        }
    }
    .ephemeral(true);

    if let Err(e) = command
        .create_response(&ctx.http, CreateInteractionResponse::Message(message))
        .await
    {
        warn!(error = %e, "failed to answer slash command");
    }
}

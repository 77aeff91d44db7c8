//! Shared flow behind the prefix and slash commands: admission checks, the
//! evaluation itself, and the resulting reply.

use serenity::model::id::{ChannelId, UserId};
use serenity::model::mention::Mentionable;
use tracing::{error, info};

use evalbot_core::config::DiscordConfig;
use evalbot_eval::{compose_reply, Evaluator, JobGuard};

use crate::checks::check_eval_allowed;
use crate::send::{pick, ERROR_REPLIES, NEGATIVE_REPLIES};

/// One invocation of the eval command, from either entry point.
#[derive(Debug, Clone)]
pub struct EvalRequest {
    pub author: UserId,
    pub author_name: String,
    pub channel_id: ChannelId,
    pub in_guild: bool,
    pub roles: Vec<u64>,
    pub code: String,
    /// Per-invocation number used to vary error titles.
    pub seed: u64,
}

/// What to send back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Error {
        title: &'static str,
        description: String,
    },
}

/// Run the checks that precede an evaluation and claim the submitter's job slot.
pub fn admit(
    evaluator: &Evaluator,
    config: &DiscordConfig,
    req: &EvalRequest,
) -> Result<JobGuard, Reply> {
    if let Err(failure) =
        check_eval_allowed(config, req.in_guild, req.channel_id.get(), &req.roles)
    {
        return Err(Reply::Error {
            title: pick(NEGATIVE_REPLIES, req.seed),
            description: failure.description(),
        });
    }

    let busy = || {
        Reply::Text(format!(
            "{} You've already got a job running - please wait for it to finish!",
            req.author.mention()
        ))
    };
    if evaluator.jobs().started_at(req.author.get()).is_some() {
        return Err(busy());
    }
    if req.code.trim().is_empty() {
        return Err(Reply::Text(usage(config)));
    }
    evaluator.jobs().try_start(req.author.get()).ok_or_else(busy)
}

/// Evaluate the request and build the reply. The job slot is released on return.
pub async fn run(evaluator: &Evaluator, req: &EvalRequest, guard: JobGuard) -> Reply {
    info!(
        author = %req.author_name,
        author_id = req.author.get(),
        code = %req.code,
        "received code for evaluation"
    );

    let reply = match evaluator.evaluate(&req.code).await {
        Ok(outcome) => Reply::Text(compose_reply(&req.author.mention().to_string(), &outcome)),
        Err(e) => {
            error!(error = %e, author_id = req.author.get(), "unhandled error in eval");
            Reply::Error {
                title: pick(ERROR_REPLIES, req.seed),
                description: "Some unhandled error occurred. Sorry for that!".to_string(),
            }
        }
    };

    drop(guard);
    reply
}

/// Help text for an invocation without code.
pub fn usage(config: &DiscordConfig) -> String {
    let prefix = config.prefixes.first().map(String::as_str).unwrap_or("");
    format!(
        "**{prefix}eval** (alias **{prefix}e**) `<code>`\n\
         Run some code and get the result back. Multiple lines are supported, \
         including code wrapped in a formatted code block."
    )
}

//! Extract → run → render for a single submission.

use tracing::{debug, info};

use evalbot_core::EvalbotConfig;

use crate::error::ServiceError;
use crate::extract::extract;
use crate::harness::Harness;
use crate::jobs::JobTracker;
use crate::paste::{OverflowStore, PasteClient};
use crate::policy::is_comment_only;
use crate::render::{render, Rendered};
use crate::service::{build_http_client, CodeExecutor, SnekboxClient};

/// Why a submission was answered without running it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Nothing left after extraction.
    Empty,
    /// Only comment lines.
    CommentOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalOutcome {
    Completed {
        rendered: Rendered,
        /// Link to the full output when the display was truncated and the
        /// upload succeeded.
        paste_link: Option<String>,
    },
    Skipped(SkipReason),
}

pub struct Evaluator {
    executor: Box<dyn CodeExecutor>,
    store: Box<dyn OverflowStore>,
    harness: Harness,
    comment_marker: String,
    jobs: JobTracker,
}

impl Evaluator {
    pub fn new(
        executor: Box<dyn CodeExecutor>,
        store: Box<dyn OverflowStore>,
        harness: Harness,
        comment_marker: impl Into<String>,
    ) -> Self {
        Self {
            executor,
            store,
            harness,
            comment_marker: comment_marker.into(),
            jobs: JobTracker::new(),
        }
    }

    /// Build the snekbox and paste clients from config.
    pub fn from_config(config: &EvalbotConfig) -> Result<Self, ServiceError> {
        let client = build_http_client(config.services.timeout_secs)?;
        Ok(Self::new(
            Box::new(SnekboxClient::new(
                client.clone(),
                config.services.snekbox_url.clone(),
            )),
            Box::new(PasteClient::new(client, config.services.paste_url.clone())),
            Harness::from_config(&config.harness),
            config.harness.comment_marker.clone(),
        ))
    }

    pub fn jobs(&self) -> &JobTracker {
        &self.jobs
    }

    /// Run one submission through the whole pipeline.
    ///
    /// Only execution failures are returned as errors; paste upload failures
    /// just leave `paste_link` empty.
    pub async fn evaluate(&self, raw: &str) -> Result<EvalOutcome, ServiceError> {
        let extraction = extract(raw);
        debug!(
            kind = %extraction.kind.describe(),
            code = %extraction.code,
            "extracted code for evaluation"
        );

        if extraction.code.trim().is_empty() {
            return Ok(EvalOutcome::Skipped(SkipReason::Empty));
        }
        if is_comment_only(&extraction.code, &self.comment_marker) {
            debug!("submission is comments only, not running it");
            return Ok(EvalOutcome::Skipped(SkipReason::CommentOnly));
        }

        let script = self.harness.wrap(&extraction.code);
        let output = self.executor.execute(&script).await?;

        let rendered = render(&output, self.store.as_ref()).await;
        let paste_link = rendered.overflow_key.as_deref().map(|key| self.store.link(key));
        if rendered.truncated {
            info!(
                paste_link = paste_link.as_deref().unwrap_or("-"),
                "eval output truncated"
            );
        }

        Ok(EvalOutcome::Completed {
            rendered,
            paste_link,
        })
    }
}

/// Build the reply message for `outcome`, addressed to `mention`.
pub fn compose_reply(mention: &str, outcome: &EvalOutcome) -> String {
    let header = format!("{mention} Your eval job has completed.\n\n");
    match outcome {
        EvalOutcome::Completed {
            rendered,
            paste_link,
        } if !rendered.display.trim().is_empty() => {
            let mut msg = format!("{header}```py\n{}\n```", rendered.display);
            if let Some(link) = paste_link {
                msg.push_str(&format!("\nFull output: {link}"));
            }
            msg
        }
        _ => format!("{header}```[No output]```"),
    }
}

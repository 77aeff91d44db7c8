//! evalbot-eval — turns a chat message into sandboxed code and the sandbox
//! result back into a reply that is safe to post.
//!
//! Pipeline:
//! - [`extract`]: recover the code from a fenced block, inline code, or bare text
//! - [`policy`]: skip submissions that would not produce output
//! - [`harness`]: wrap the code in the sandbox preamble
//! - [`service`]: run it on the remote execution service
//! - [`render`]: number, bound, and sanitise the output, offloading overflow to [`paste`]

pub mod error;
pub mod extract;
pub mod harness;
pub mod jobs;
pub mod paste;
pub mod patterns;
pub mod pipeline;
pub mod policy;
pub mod render;
pub mod service;

pub use error::ServiceError;
pub use extract::{extract, Extraction, SourceKind};
pub use jobs::{JobGuard, JobTracker};
pub use paste::{OverflowStore, PasteClient};
pub use pipeline::{compose_reply, EvalOutcome, Evaluator, SkipReason};
pub use render::{render, Rendered};
pub use service::{CodeExecutor, SnekboxClient};

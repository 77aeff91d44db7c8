//! Discord front end for evalbot: the `eval` prefix command and the `/eval`
//! slash command.

pub mod adapter;
pub mod checks;
pub mod commands;
pub mod error;
pub mod eval;
pub mod handler;
pub mod prefix;
pub mod send;

pub use adapter::DiscordAdapter;
pub use error::DiscordError;

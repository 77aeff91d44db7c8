pub mod config;
pub mod error;

pub use config::EvalbotConfig;
pub use error::{EvalbotError, Result};

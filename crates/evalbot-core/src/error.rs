use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalbotError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<figment::Error> for EvalbotError {
    fn from(e: figment::Error) -> Self {
        EvalbotError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvalbotError>;

/// Errors from the remote execution and paste services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("response has no `{0}` field")]
    MissingField(&'static str),

    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl ServiceError {
    /// Connection failures and timeouts are reported as `Unavailable`.
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            ServiceError::Unavailable(e.to_string())
        } else {
            ServiceError::Http(e)
        }
    }
}

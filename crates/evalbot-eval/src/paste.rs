use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::ServiceError;

/// Unbounded storage for output that did not fit in a reply.
#[async_trait]
pub trait OverflowStore: Send + Sync {
    /// Store `text` and return the key it can be retrieved with.
    async fn upload(&self, text: &str) -> Result<String, ServiceError>;

    /// Public URL for a key returned by [`OverflowStore::upload`].
    fn link(&self, key: &str) -> String;
}

/// Hastebin-style paste service client.
///
/// The URL template holds a `{key}` placeholder: uploads go to the template
/// with `documents` substituted, links use the returned key.
pub struct PasteClient {
    client: reqwest::Client,
    url_template: String,
}

#[derive(Debug, Deserialize)]
struct PasteResponse {
    key: Option<String>,
}

impl PasteClient {
    pub fn new(client: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    fn url_for(&self, key: &str) -> String {
        self.url_template.replace("{key}", key)
    }
}

#[async_trait]
impl OverflowStore for PasteClient {
    async fn upload(&self, text: &str) -> Result<String, ServiceError> {
        let url = self.url_for("documents");
        debug!(url = %url, chars = text.chars().count(), "uploading to paste service");

        let resp = self
            .client
            .post(&url)
            .body(text.to_owned())
            .send()
            .await
            .map_err(ServiceError::from_send)?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status, body = %message, "paste service error");
            return Err(ServiceError::Api { status, message });
        }

        let body: PasteResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        body.key.ok_or(ServiceError::MissingField("key"))
    }

    fn link(&self, key: &str) -> String {
        self.url_for(key)
    }
}

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ServiceError;

/// Remote sandbox that runs a piece of code and returns what it printed.
#[async_trait]
pub trait CodeExecutor: Send + Sync {
    async fn execute(&self, code: &str) -> Result<String, ServiceError>;
}

/// HTTP client shared by the execution and paste services.
pub fn build_http_client(timeout_secs: u64) -> Result<reqwest::Client, ServiceError> {
    Ok(reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Client for a snekbox-style `POST {"code": ...}` → `{"output": ...}` endpoint.
pub struct SnekboxClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct ExecRequest<'a> {
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExecResponse {
    output: Option<String>,
}

impl SnekboxClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl CodeExecutor for SnekboxClient {
    async fn execute(&self, code: &str) -> Result<String, ServiceError> {
        debug!(url = %self.url, bytes = code.len(), "sending code to snekbox");

        let resp = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&ExecRequest { code })
            .send()
            .await
            .map_err(ServiceError::from_send)?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let message = resp.text().await.unwrap_or_default();
            warn!(status, body = %message, "snekbox error");
            return Err(ServiceError::Api { status, message });
        }

        let body: ExecResponse = resp
            .json()
            .await
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        body.output.ok_or(ServiceError::MissingField("output"))
    }
}

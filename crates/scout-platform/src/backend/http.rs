//! HTTP chat backend adapter.
//!
//! One JSON POST per chat turn: `{"user_query", "session_id"}` in,
//! `{"response": string}` out. Uses reqwest on the app's tokio runtime.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use scout_core::ports::{ChatBackendPort, ChatQuery};
use scout_types::{Result, ScoutError, config::BackendConfig};

pub struct HttpChatBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpChatBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ScoutError::Config("Backend endpoint is empty".to_string()));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ScoutError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }
}

#[async_trait]
impl ChatBackendPort for HttpChatBackend {
    async fn generate(&self, query: &ChatQuery) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(query)
            .send()
            .await
            .map_err(|e| ScoutError::BackendUnreachable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ScoutError::BackendUnreachable(e.to_string()))?;

        parse_reply(status, &body)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Interpret a backend reply.
///
/// Non-2xx is a [`ScoutError::BackendHttp`]; a 2xx body without a string
/// `response` field is a [`ScoutError::BackendContract`].
pub fn parse_reply(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(ScoutError::BackendHttp {
            status,
            body: body.to_string(),
        });
    }

    let data: Value = serde_json::from_str(body)
        .map_err(|e| ScoutError::BackendContract(format!("Reply is not JSON: {}", e)))?;

    match data.get("response") {
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(ScoutError::BackendContract(format!(
            "`response` is not a string: {}",
            other
        ))),
        None => Err(ScoutError::BackendContract(
            "Reply has no `response` field".to_string(),
        )),
    }
}

use async_trait::async_trait;
use docsum_common::{AppConfig, DocSumError, Result};
use reqwest::{Client, StatusCode};
use tracing::{debug, info};

use crate::llm_trait::LlmClient;
use crate::types::{ChatRequest, ResponseEnvelope};

/// Groq chat completions client (OpenAI-compatible API)
#[derive(Debug, Clone)]
pub struct GroqClient {
    base_url: String,
    api_key: String,
    client: Client,
}

impl GroqClient {
    /// Create new client; fails before any network call when the credential is missing
    pub fn new(config: &AppConfig) -> Result<Self> {
        let api_key = config.require_api_key()?.to_string();
        let base_url = config.api_base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .user_agent(concat!("docsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                DocSumError::configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        info!("LLM client initialized: {}", base_url);
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl LlmClient for GroqClient {
    async fn chat(&self, request: ChatRequest) -> Result<ResponseEnvelope> {
        debug!(
            "Sending chat request - Model: {}, Messages: {}, Timeout: {:?}",
            request.model,
            request.messages.len(),
            request.timeout
        );

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let reason = if e.is_timeout() {
                    format!("request timed out after {:?}", request.timeout)
                } else {
                    format!("failed to reach {}: {}", self.base_url, e)
                };
                DocSumError::upstream(None, reason)
            })?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(DocSumError::configuration(format!(
                "LLM endpoint rejected the API key ({})",
                status
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocSumError::upstream(
                Some(status.as_u16()),
                format!("LLM endpoint returned {}: {}", status, body.trim()),
            ));
        }

        let body = response.text().await.map_err(|e| {
            DocSumError::upstream(Some(status.as_u16()), format!("failed to read body: {}", e))
        })?;

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| {
            DocSumError::response_shape(format!("response body is not JSON: {}", e))
        })?;

        debug!("Received chat response - Length: {} bytes", body.len());
        Ok(ResponseEnvelope::from_json(value))
    }
}

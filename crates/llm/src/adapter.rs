use docsum_common::{AppConfig, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::llm_trait::LlmClient;
use crate::types::{ChatMessage, ChatRequest, NormalizedResponse};

/// Low temperature keeps summaries close to the source text
const SUMMARY_TEMPERATURE: f32 = 0.3;

/// Single-call bridge between prompts and an [`LlmClient`]
#[derive(Clone)]
pub struct LlmAdapter {
    client: Arc<dyn LlmClient>,
    model: String,
    timeout: Duration,
}

impl LlmAdapter {
    /// Create new adapter using the configured model and timeout
    pub fn new(client: Arc<dyn LlmClient>, config: &AppConfig) -> Self {
        Self {
            client,
            model: config.llm_model.clone(),
            timeout: config.request_timeout(),
        }
    }

    /// Send one prompt and return the normalized completion text
    pub async fn call(&self, prompt: &str) -> Result<NormalizedResponse> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(SUMMARY_TEMPERATURE),
            timeout: self.timeout,
        };

        debug!(
            "Calling LLM - Model: {}, Prompt length: {} chars",
            self.model,
            prompt.chars().count()
        );

        let response = self.client.chat(request).await?.normalize()?;

        debug!("LLM returned {} chars", response.text.chars().count());
        Ok(response)
    }
}

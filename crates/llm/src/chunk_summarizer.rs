use docsum_common::{Result, Stage};
use tracing::warn;

use crate::adapter::LlmAdapter;
use crate::prompts::{summary_prompt, LengthMode};

/// Summarizes one unit of text with a single LLM call
#[derive(Clone)]
pub struct ChunkSummarizer {
    adapter: LlmAdapter,
}

impl ChunkSummarizer {
    pub fn new(adapter: LlmAdapter) -> Self {
        Self { adapter }
    }

    /// Summarize `text` at the requested length.
    ///
    /// Failures are annotated with `stage` and propagated as-is.
    pub async fn summarize(&self, text: &str, mode: LengthMode, stage: Stage) -> Result<String> {
        let prompt = summary_prompt(text, mode);

        match self.adapter.call(&prompt).await {
            Ok(response) => Ok(response.text.trim().to_string()),
            Err(e) => {
                warn!("LLM call failed at {}: {}", stage, e);
                Err(e.at(stage))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use docsum_common::{AppConfig, DocSumError};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_summarize_trims_output_and_uses_mode() {
        let client = Arc::new(ScriptedClient::constant("\n  Three sentences here.  \n"));
        let summarizer =
            ChunkSummarizer::new(LlmAdapter::new(client.clone(), &AppConfig::default()));

        let summary = summarizer
            .summarize("Some text.", LengthMode::Long, Stage::SinglePass)
            .await
            .unwrap();

        assert_eq!(summary, "Three sentences here.");
        assert_eq!(client.calls(), 1);
        assert!(client.prompts()[0].contains(LengthMode::Long.instruction()));
        assert!(client.prompts()[0].contains("Some text."));
    }

    #[tokio::test]
    async fn test_failure_carries_chunk_index() {
        let client = Arc::new(ScriptedClient::new(|_, _| {
            Err(DocSumError::upstream(Some(503), "unavailable"))
        }));
        let summarizer = ChunkSummarizer::new(LlmAdapter::new(client, &AppConfig::default()));

        let err = summarizer
            .summarize("Some text.", LengthMode::Short, Stage::Chunk { index: 4 })
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Chunk { index: 4 }));
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("chunk 4: "));
    }
}

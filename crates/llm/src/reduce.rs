use docsum_common::{Result, Stage};
use tracing::{debug, info, warn};

use crate::chunk_summarizer::ChunkSummarizer;
use crate::prompts::LengthMode;

/// Separator between partial summaries in the combined text
pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Joins partial summaries and compresses them once when they run long
#[derive(Clone)]
pub struct Reducer {
    summarizer: ChunkSummarizer,
    threshold: usize,
}

impl Reducer {
    pub fn new(summarizer: ChunkSummarizer, threshold: usize) -> Self {
        Self {
            summarizer,
            threshold,
        }
    }

    /// Combine ordered partial summaries into the text for the final pass.
    ///
    /// At most one compression pass runs; its result is used even if it is
    /// still above the threshold.
    pub async fn reduce(&self, partials: &[String]) -> Result<String> {
        let combined = partials
            .iter()
            .map(|partial| partial.trim())
            .collect::<Vec<_>>()
            .join(PARAGRAPH_SEPARATOR);

        let length = combined.chars().count();
        if length <= self.threshold {
            debug!("Combined {} partial summaries - {} chars", partials.len(), length);
            return Ok(combined);
        }

        info!(
            "Combined summaries exceed threshold ({} > {} chars), compressing",
            length, self.threshold
        );
        let compressed = self
            .summarizer
            .summarize(&combined, LengthMode::Long, Stage::Combine)
            .await?;

        let compressed_length = compressed.chars().count();
        if compressed_length > self.threshold {
            warn!(
                "Compressed summaries still above threshold ({} > {} chars)",
                compressed_length, self.threshold
            );
        }

        Ok(compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::LlmAdapter;
    use crate::testing::ScriptedClient;
    use docsum_common::{AppConfig, DocSumError};
    use std::sync::Arc;

    fn reducer(client: Arc<ScriptedClient>, threshold: usize) -> Reducer {
        let adapter = LlmAdapter::new(client, &AppConfig::default());
        Reducer::new(ChunkSummarizer::new(adapter), threshold)
    }

    #[tokio::test]
    async fn test_small_combination_is_joined_in_order() {
        let client = Arc::new(ScriptedClient::constant("unused"));
        let reducer = reducer(client.clone(), 1000);

        let partials = vec!["First. ".to_string(), " Second.".to_string(), "Third.".to_string()];
        let combined = reducer.reduce(&partials).await.unwrap();

        assert_eq!(combined, "First.\n\nSecond.\n\nThird.");
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_large_combination_is_compressed_once_with_long_mode() {
        let client = Arc::new(ScriptedClient::constant("Compressed overview."));
        let reducer = reducer(client.clone(), 20);

        let partials = vec!["a".repeat(15), "b".repeat(15)];
        let combined = reducer.reduce(&partials).await.unwrap();

        assert_eq!(combined, "Compressed overview.");
        assert_eq!(client.calls(), 1);
        let prompt = &client.prompts()[0];
        assert!(prompt.contains(LengthMode::Long.instruction()));
        assert!(prompt.contains(&format!("{}\n\n{}", "a".repeat(15), "b".repeat(15))));
    }

    #[tokio::test]
    async fn test_compression_that_stays_large_is_accepted() {
        let still_long = "z".repeat(50);
        let client = Arc::new(ScriptedClient::constant(&still_long));
        let reducer = reducer(client.clone(), 20);

        let partials = vec!["a".repeat(30)];
        let combined = reducer.reduce(&partials).await.unwrap();

        assert_eq!(combined, still_long);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_compression_failure_is_tagged_combine() {
        let client = Arc::new(ScriptedClient::new(|_, _| {
            Err(DocSumError::response_shape("no choices"))
        }));
        let reducer = reducer(client, 5);

        let err = reducer.reduce(&["long enough".to_string()]).await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Combine));
    }
}

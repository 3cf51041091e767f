use docsum_common::{AppConfig, Result, Stage};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use crate::adapter::LlmAdapter;
use crate::chunk_summarizer::ChunkSummarizer;
use crate::chunking::split;
use crate::client::GroqClient;
use crate::llm_trait::LlmClient;
use crate::pacing::{RateLimiter, TokenBucket, Unlimited};
use crate::prompts::LengthMode;
use crate::reduce::Reducer;

/// Summarizer for long text using a chunk, summarize, reduce strategy
pub struct Summarizer {
    chunk_summarizer: ChunkSummarizer,
    reducer: Reducer,
    limiter: Arc<dyn RateLimiter>,
    chunk_max_chars: usize,
    max_concurrent_chunks: usize,
}

impl Summarizer {
    /// Create new summarizer around an injected client and rate limiter
    pub fn new(
        client: Arc<dyn LlmClient>,
        limiter: Arc<dyn RateLimiter>,
        config: &AppConfig,
    ) -> Self {
        let chunk_summarizer = ChunkSummarizer::new(LlmAdapter::new(client, config));
        let reducer = Reducer::new(chunk_summarizer.clone(), config.combine_threshold);

        Self {
            chunk_summarizer,
            reducer,
            limiter,
            chunk_max_chars: config.chunk_max_chars.max(1),
            max_concurrent_chunks: config.max_concurrent_chunks.max(1),
        }
    }

    /// Wire the Groq client and pacing from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        let client = GroqClient::new(config)?;

        let limiter: Arc<dyn RateLimiter> = if config.pacing_delay().is_zero() {
            Arc::new(Unlimited)
        } else {
            Arc::new(TokenBucket::with_delay(config.pacing_delay()))
        };

        Ok(Self::new(Arc::new(client), limiter, config))
    }

    /// Summarize with a raw length selector ("short", "medium", "long")
    pub async fn generate_summary_for(&self, text: &str, selector: &str) -> Result<String> {
        self.generate_summary(text, LengthMode::from_selector(selector))
            .await
    }

    /// Summarize a document.
    ///
    /// Returns an empty string for empty or whitespace-only input. Any
    /// failure aborts the whole run; no partial summary is returned.
    pub async fn generate_summary(&self, text: &str, mode: LengthMode) -> Result<String> {
        let request_id = Uuid::new_v4();
        let span = info_span!("summarize", %request_id, %mode);

        self.run(text, mode)
            .instrument(span)
            .await
            .map_err(|e| {
                error!(%request_id, "Summarization failed: {}", e);
                e
            })
    }

    async fn run(&self, text: &str, mode: LengthMode) -> Result<String> {
        if text.trim().is_empty() {
            debug!("Empty document, nothing to summarize");
            return Ok(String::new());
        }

        let length = text.chars().count();
        info!("Starting summarization - Text length: {} chars", length);

        if length <= self.chunk_max_chars {
            debug!("Text fits in one chunk, using direct summarization");
            return self
                .chunk_summarizer
                .summarize(text.trim(), mode, Stage::SinglePass)
                .await;
        }

        let chunks = split(text.trim(), self.chunk_max_chars);
        info!("Split text into {} chunks", chunks.len());

        let partials = self.summarize_chunks(&chunks, mode).await?;

        let combined = self.reducer.reduce(&partials).await?;
        info!("Reduced chunk summaries - Length: {} chars", combined.chars().count());

        self.chunk_summarizer
            .summarize(&combined, mode, Stage::FinalPass)
            .await
    }

    /// Summarize every chunk, paced by the rate limiter, keeping document order
    async fn summarize_chunks(&self, chunks: &[String], mode: LengthMode) -> Result<Vec<String>> {
        let total = chunks.len();

        stream::iter(chunks.iter().enumerate())
            .map(move |(index, chunk)| async move {
                self.limiter.acquire().await;
                debug!("Summarizing chunk {}/{}", index + 1, total);
                self.chunk_summarizer
                    .summarize(chunk, mode, Stage::Chunk { index })
                    .await
            })
            .buffered(self.max_concurrent_chunks)
            .try_collect()
            .await
    }
}

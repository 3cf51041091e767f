//! DocSum LLM integration
//!
//! Chat completions client and hierarchical document summarization

mod adapter;
mod chunk_summarizer;
mod chunking;
mod client;
mod llm_trait;
mod pacing;
mod prompts;
mod reduce;
mod summarize;
mod types;

#[cfg(test)]
mod testing;

pub use adapter::LlmAdapter;
pub use chunk_summarizer::ChunkSummarizer;
pub use chunking::split;
pub use client::GroqClient;
pub use llm_trait::LlmClient;
pub use pacing::{RateLimiter, TokenBucket, Unlimited};
pub use prompts::{summary_prompt, LengthMode};
pub use reduce::{Reducer, PARAGRAPH_SEPARATOR};
pub use summarize::Summarizer;
pub use types::{
    AssistantMessage, ChatCompletion, ChatMessage, ChatRequest, Choice, NormalizedResponse,
    ResponseEnvelope, Role,
};

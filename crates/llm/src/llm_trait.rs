use async_trait::async_trait;
use docsum_common::Result;

use crate::types::{ChatRequest, ResponseEnvelope};

/// Common trait for chat completion backends
///
/// One call means one outbound request: implementations do not retry or cache.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a chat completion request and return the raw envelope
    async fn chat(&self, request: ChatRequest) -> Result<ResponseEnvelope>;
}

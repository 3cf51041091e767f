//! In-memory LLM client for pipeline tests

use async_trait::async_trait;
use docsum_common::Result;
use serde_json::json;
use std::sync::Mutex;

use crate::llm_trait::LlmClient;
use crate::types::{ChatRequest, ResponseEnvelope};

type Script = dyn Fn(usize, &str) -> Result<String> + Send + Sync;

/// Answers each call from a script and records every prompt it saw
pub(crate) struct ScriptedClient {
    script: Box<Script>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub(crate) fn new<F>(script: F) -> Self
    where
        F: Fn(usize, &str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answers with `reply`
    pub(crate) fn constant(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn chat(&self, request: ChatRequest) -> Result<ResponseEnvelope> {
        let prompt = request
            .messages
            .last()
            .map(|message| message.content.clone())
            .unwrap_or_default();

        let index = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.clone());
            prompts.len() - 1
        };

        let text = (self.script)(index, &prompt)?;
        Ok(ResponseEnvelope::Mapping(json!({
            "choices": [{"message": {"role": "assistant", "content": text}}]
        })))
    }
}

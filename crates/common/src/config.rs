use crate::error::DocSumError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// DocSum application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Credential for the completion endpoint
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// OpenAI-compatible API base URL
    pub api_base_url: String,

    /// Model identifier sent with every completion request
    pub llm_model: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Upper bound on chunk size, in characters
    pub chunk_max_chars: usize,

    /// Combined partial summaries above this size get one compression pass
    pub combine_threshold: usize,

    /// Minimum spacing between chunk calls, in milliseconds
    pub pacing_delay_ms: u64,

    /// Chunk calls allowed in flight at once
    pub max_concurrent_chunks: usize,

    /// Log directory (console only when unset)
    pub log_dir: Option<PathBuf>,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://api.groq.com/openai/v1".to_string(),
            llm_model: "llama-3.1-8b-instant".to_string(),
            request_timeout_secs: 60,
            chunk_max_chars: 9000,
            combine_threshold: 16000,
            pacing_delay_ms: 200,
            max_concurrent_chunks: 1,
            log_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, DocSumError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DocSumError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let config = Self {
            api_key: get("GROQ_API_KEY"),
            api_base_url: get("LLM_API_BASE_URL").unwrap_or(defaults.api_base_url),
            llm_model: get("LLM_MODEL").unwrap_or(defaults.llm_model),
            request_timeout_secs: parse_var(&get, "LLM_TIMEOUT_SECS")?
                .unwrap_or(defaults.request_timeout_secs),
            chunk_max_chars: parse_var(&get, "CHUNK_MAX_CHARS")?
                .unwrap_or(defaults.chunk_max_chars),
            combine_threshold: parse_var(&get, "COMBINE_SUMMARIES_THRESHOLD")?
                .unwrap_or(defaults.combine_threshold),
            pacing_delay_ms: parse_var(&get, "PACING_DELAY_MS")?
                .unwrap_or(defaults.pacing_delay_ms),
            max_concurrent_chunks: parse_var(&get, "MAX_CONCURRENT_CHUNKS")?
                .unwrap_or(defaults.max_concurrent_chunks),
            log_dir: get("LOG_DIR").map(PathBuf::from),
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        Ok(config)
    }

    /// Credential, or a configuration error when none was provided
    pub fn require_api_key(&self) -> Result<&str, DocSumError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DocSumError::configuration("LLM client not configured. Set GROQ_API_KEY in env.")
            })
    }

    /// Per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay between successive chunk calls
    pub fn pacing_delay(&self) -> Duration {
        Duration::from_millis(self.pacing_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), DocSumError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(DocSumError::configuration(
                "LLM API base URL must start with http:// or https://",
            ));
        }

        if self.llm_model.trim().is_empty() {
            return Err(DocSumError::configuration("LLM model name cannot be empty"));
        }

        if self.request_timeout_secs == 0 {
            return Err(DocSumError::configuration("LLM_TIMEOUT_SECS cannot be 0"));
        }

        if self.chunk_max_chars == 0 {
            return Err(DocSumError::configuration("CHUNK_MAX_CHARS cannot be 0"));
        }

        if self.combine_threshold == 0 {
            return Err(DocSumError::configuration(
                "COMBINE_SUMMARIES_THRESHOLD cannot be 0",
            ));
        }

        if self.max_concurrent_chunks == 0 {
            return Err(DocSumError::configuration("MAX_CONCURRENT_CHUNKS cannot be 0"));
        }

        Ok(())
    }
}

fn parse_var<T, G>(get: &G, key: &str) -> Result<Option<T>, DocSumError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    get(key)
        .map(|raw| {
            raw.trim().parse().map_err(|_| {
                DocSumError::configuration(format!("Invalid value for {}: {:?}", key, raw))
            })
        })
        .transpose()
}

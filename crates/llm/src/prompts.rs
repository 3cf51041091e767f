//! Prompt templates for summarization

use std::fmt;
use std::str::FromStr;

/// Requested summary verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LengthMode {
    Short,
    #[default]
    Medium,
    Long,
}

impl LengthMode {
    /// Parse a caller-supplied selector; anything unrecognized means medium
    pub fn from_selector(selector: &str) -> Self {
        selector.parse().unwrap_or_default()
    }

    /// Fixed instruction for this length
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Short => {
                "Summarize concisely in 3–4 sentences, focusing on the most important points."
            }
            Self::Medium => {
                "Summarize in a medium-length paragraph (6–10 sentences), covering key points."
            }
            Self::Long => "Summarize in detail, covering all major points clearly and thoroughly.",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }
}

impl FromStr for LengthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            "long" => Ok(Self::Long),
            other => Err(format!("unknown length mode '{}'", other)),
        }
    }
}

impl fmt::Display for LengthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt for summarizing one unit of text
pub fn summary_prompt(text: &str, mode: LengthMode) -> String {
    format!(
        "You are an expert document summarizer.\n{}\n\nDocument:\n{}\n\nProvide the summary, keep it in plain text (no Markdown or extra symbols).",
        mode.instruction(),
        text
    )
}

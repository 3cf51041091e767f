use std::fmt;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Whole document summarized in one call
    SinglePass,

    /// Map phase, one call per chunk (zero-based index)
    Chunk { index: usize },

    /// Compression of the combined partial summaries
    Combine,

    /// Final summary over the combined text
    FinalPass,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePass => write!(f, "single pass"),
            Self::Chunk { index } => write!(f, "chunk {}", index),
            Self::Combine => write!(f, "combine pass"),
            Self::FinalPass => write!(f, "final pass"),
        }
    }
}

/// DocSum error types
#[derive(Debug, thiserror::Error)]
pub enum DocSumError {
    /// Missing or rejected credential, invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Network failure, timeout or non-success status from the LLM endpoint
    #[error("Upstream error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Response arrived but no summary text could be extracted
    #[error("Unexpected response shape: {0}")]
    ResponseShape(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error annotated with the pipeline stage it surfaced from
    #[error("{stage}: {source}")]
    Stage {
        stage: Stage,
        #[source]
        source: Box<DocSumError>,
    },
}

impl DocSumError {
    /// Create configuration error
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create upstream error, optionally carrying the HTTP status
    pub fn upstream<S: Into<String>>(status: Option<u16>, msg: S) -> Self {
        Self::Upstream {
            status,
            message: msg.into(),
        }
    }

    /// Create response shape error
    pub fn response_shape<S: Into<String>>(msg: S) -> Self {
        Self::ResponseShape(msg.into())
    }

    /// Create invalid input error
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Annotate with the stage this error is passing through.
    ///
    /// An error that already carries a stage keeps its innermost one.
    pub fn at(self, stage: Stage) -> Self {
        match self {
            annotated @ Self::Stage { .. } => annotated,
            other => Self::Stage {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Stage annotation, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Underlying error with stage annotations stripped
    pub fn root(&self) -> &DocSumError {
        match self {
            Self::Stage { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether a caller may retry the request with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self.root(), Self::Upstream { .. })
    }

    /// Process exit status for the CLI
    pub fn exit_code(&self) -> i32 {
        match self.root() {
            Self::InvalidInput(_) => 2,
            Self::Configuration(_) => 3,
            Self::Upstream { .. } => 4,
            Self::ResponseShape(_) => 5,
            Self::Stage { .. } => 1,
        }
    }
}

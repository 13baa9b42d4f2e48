//! Core error type for Arbiter

use thiserror::Error;

/// Result type alias for Arbiter operations
pub type ArbiterResult<T> = Result<T, ArbiterError>;

/// Main error type for Arbiter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArbiterError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// The context analyzer failed
    #[error("Context analysis failed: {message}")]
    Analysis {
        message: String,
        context: Option<String>,
    },

    /// The context matcher failed
    #[error("Pattern matching failed: {message}")]
    Matching {
        message: String,
        context: Option<String>,
    },

    /// Any other external collaborator failed (calculator, store). Built by
    /// collaborator implementations through [`ArbiterError::collaborator`].
    #[error("{collaborator} error: {message}")]
    Collaborator {
        collaborator: String,
        message: String,
    },

    /// The referenced pattern does not exist in the store
    #[error("Pattern not found: {pattern_id}")]
    PatternNotFound { pattern_id: String },

    /// Invalid input errors
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// Storage/persistence errors
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },
}

impl ArbiterError {
    /// Stable code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "ARBITER_CONFIG",
            Self::Analysis { .. } => "ARBITER_ANALYSIS",
            Self::Matching { .. } => "ARBITER_MATCHING",
            Self::Collaborator { .. } => "ARBITER_COLLABORATOR",
            Self::PatternNotFound { .. } => "ARBITER_PATTERN_NOT_FOUND",
            Self::InvalidInput { .. } => "ARBITER_INVALID_INPUT",
            Self::Storage { .. } => "ARBITER_STORAGE",
            Self::Json { .. } => "ARBITER_JSON",
            Self::Io { .. } => "ARBITER_IO",
        }
    }

    /// Whether re-issuing the same request may succeed.
    ///
    /// Upstream collaborator failures are transient from the engine's point
    /// of view; everything else is deterministic.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Analysis { .. }
                | Self::Matching { .. }
                | Self::Collaborator { .. }
                | Self::Storage { .. }
        )
    }

    /// Optional context attached to the error
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. }
            | Self::Analysis { context, .. }
            | Self::Matching { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            Self::InvalidInput { field, .. } => field.as_deref(),
            _ => None,
        }
    }
}

//! Constructor methods for ArbiterError

use super::types::ArbiterError;

impl ArbiterError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a context analysis error
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
            context: None,
        }
    }

    /// Create a context analysis error with context
    pub fn analysis_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a pattern matching error
    pub fn matching(message: impl Into<String>) -> Self {
        Self::Matching {
            message: message.into(),
            context: None,
        }
    }

    /// Create a pattern matching error with context
    pub fn matching_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Matching {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a collaborator error
    pub fn collaborator(collaborator: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }

    /// Create a pattern-not-found error
    pub fn pattern_not_found(pattern_id: impl Into<String>) -> Self {
        Self::PatternNotFound {
            pattern_id: pattern_id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: None,
        }
    }

    /// Create an invalid input error naming the offending field
    pub fn invalid_input_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error for a specific path
    pub fn io_with_path(message: impl Into<String>, path: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

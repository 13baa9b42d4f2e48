//! From trait implementations for ArbiterError conversions

use super::types::ArbiterError;

impl From<std::io::Error> for ArbiterError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for ArbiterError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

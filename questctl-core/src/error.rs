/// Structured error types for questctl-core.
///
/// Uses `thiserror` for better API surface and error composition.
/// The binary crate (questctl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for questctl-core operations
#[derive(Error, Debug)]
pub enum QuestError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// No matching quest marker in the transcript
    #[error("no {what} found in transcript")]
    NotFound { what: String },

    /// A classified message is missing or mangling an expected field
    #[error("failed to parse message {text:?}: {reason}")]
    MessageParse { text: String, reason: String },

    /// Invalid epoch-millisecond timestamp
    #[error("invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: i64, reason: String },

    /// Remote API call failed
    #[error("remote error during {operation}: {reason}")]
    Remote { operation: String, reason: String },

    /// Quest queue file is unreadable or malformed
    #[error("queue file error at {path:?}: {reason}")]
    Queue { path: PathBuf, reason: String },

    /// Configuration error
    #[error("configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for questctl-core operations
pub type Result<T> = std::result::Result<T, QuestError>;

impl QuestError {
    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Create a message parse error
    pub fn message_parse(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MessageParse {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid timestamp error
    pub fn invalid_timestamp(value: i64, reason: impl Into<String>) -> Self {
        Self::InvalidTimestamp {
            value,
            reason: reason.into(),
        }
    }

    /// Create a remote API error
    pub fn remote(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a queue file error
    pub fn queue(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Queue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// True when the error means "no quest data available" rather than a
    /// fault. Scheduled callers treat this as a clean no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QuestError::not_found("quest completion message");
        assert_eq!(
            err.to_string(),
            "no quest completion message found in transcript"
        );

        let err = QuestError::remote("fetch group chat", "503 service unavailable");
        assert!(err.to_string().contains("fetch group chat"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_not_found_predicate() {
        assert!(QuestError::not_found("quest start message").is_not_found());
        assert!(!QuestError::config("missing api_token").is_not_found());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let quest_err: QuestError = io_err.into();

        assert!(matches!(quest_err, QuestError::Io { .. }));
    }
}

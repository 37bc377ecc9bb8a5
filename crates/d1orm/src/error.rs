//! Error types for d1orm

use thiserror::Error;

/// Result type alias for d1orm operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for D1 operations
#[derive(Debug, Error)]
pub enum OrmError {
    /// The HTTP request could not be sent or its body could not be read
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response that did not carry a D1 envelope
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// D1 answered with `success: false`
    #[error("D1 error: {messages}")]
    Api { messages: String },

    /// D1 answered with `success: true` but no result set
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Validation error (raised before any request is sent)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A [`QueryHook`](crate::QueryHook) vetoed the statement; nothing was sent
    #[error("Statement aborted by hook: {0}")]
    Aborted(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Missing or invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrmError {
    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if D1 itself reported the failure
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if a hook refused to let the statement run
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }

    /// The provider's error messages, if D1 reported the failure.
    pub fn api_messages(&self) -> Option<&str> {
        match self {
            Self::Api { messages } => Some(messages),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

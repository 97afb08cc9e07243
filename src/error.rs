//! Error types for typed command dispatch.

use thiserror::Error;

/// Errors surfaced by an invocation.
///
/// The first group is produced by invocation primitives and travels through the
/// dispatcher untouched. The second group originates at the dispatcher's own
/// boundaries (decoding a response, encoding arguments).
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Command '{command}' rejected: {message}")]
    Rejected { command: String, message: String },

    #[error("Command '{command}' timed out after {elapsed_ms} ms")]
    Timeout { command: String, elapsed_ms: u64 },

    #[error("Command '{0}' aborted")]
    Aborted(String),

    #[error("Failed to decode response of '{command}': {source}")]
    Decode {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode arguments: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Value {position} is not valid JSON: {source}")]
    InvalidValue {
        position: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Duplicate route: {0}")]
    DuplicateRoute(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Type export failed: {0}")]
    Export(#[from] ts_rs::ExportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl InvokeError {
    /// Shorthand for a primitive rejecting a command.
    pub fn rejected(command: impl Into<String>, message: impl Into<String>) -> Self {
        InvokeError::Rejected {
            command: command.into(),
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for InvokeError {
    fn from(err: config::ConfigError) -> Self {
        InvokeError::Config(err.to_string())
    }
}

//! Error types for tool execution.

use thiserror::Error;

/// Errors that can occur while registering or executing tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Error during parameter deserialization or parsing.
    #[error("parameter error: {0}")]
    ParameterError(String),

    /// Error during tool function execution.
    #[error("execution error: {0}")]
    ExecutionError(String),

    /// A tool with this name is already registered.
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),

    /// No tool with this name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl ToolError {
    /// Creates a [`ParameterError`](Self::ParameterError).
    pub fn parameter_error(msg: impl Into<String>) -> Self {
        Self::ParameterError(msg.into())
    }

    /// Creates an [`ExecutionError`](Self::ExecutionError).
    pub fn execution_error(msg: impl Into<String>) -> Self {
        Self::ExecutionError(msg.into())
    }
}

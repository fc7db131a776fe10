//! The core [`Tool`] trait for executable tools.

use crate::error::ToolError;
use sextant_models::llm::ToolDefinition;
use std::future::Future;
use std::pin::Pin;

/// A tool that a prompt function may offer to the model.
///
/// Tools expose a [`ToolDefinition`] (name, description, JSON schema) for the
/// model, and an async [`execute`](Tool::execute) method that runs with the
/// tool's captured environment.
pub trait Tool: Send + Sync + 'static {
    /// Returns the model-facing tool definition with JSON schema.
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with JSON arguments.
    fn execute(
        &self,
        args: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + '_>>;

    /// Returns the tool's name.
    fn name(&self) -> String {
        self.definition().name
    }
}

impl core::fmt::Debug for dyn Tool {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name()).finish()
    }
}

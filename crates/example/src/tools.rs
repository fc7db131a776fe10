//! File tools offered to the assistant.
//!
//! Each tool captures the [`Sandbox`] it works in, so they implement
//! [`Tool`] by hand rather than through `#[tool]`.

use crate::sandbox::Sandbox;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sextant::sextant_tools::param::inline_schema_for;
use sextant::sextant_tools::{Tool, ToolDefinition, ToolError};
use std::future::Future;
use std::pin::Pin;

/// Parameters for the `list_files` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ListFilesParams {
    /// Directory path (relative to working directory).
    pub path: String,
}

/// Parameters for the `read_file` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ReadFileParams {
    /// File path (relative to working directory).
    pub path: String,
}

/// Parameters for the `write_file` tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct WriteFileParams {
    /// File path (relative to working directory).
    pub path: String,
    /// Content to write.
    pub content: String,
}

fn tool_def<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let mut schema = inline_schema_for::<T>();
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
        obj.remove("title");
        obj.insert("additionalProperties".to_string(), Value::Bool(false));
    }
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters: schema,
    }
}

fn parse_params<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|err| ToolError::parameter_error(err.to_string()))
}

fn resolve(sandbox: &Sandbox, path: &str) -> Result<std::path::PathBuf, ToolError> {
    sandbox
        .resolve_path(path)
        .ok_or_else(|| ToolError::execution_error(format!("path '{path}' escapes sandbox")))
}

/// Lists the entries of a directory.
#[derive(Debug, Clone)]
pub struct ListFiles {
    sandbox: Sandbox,
}

impl ListFiles {
    /// Creates the tool for a sandbox.
    #[must_use]
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }

    fn run(&self, params: &ListFilesParams) -> Result<String, ToolError> {
        let resolved = resolve(&self.sandbox, &params.path)?;
        let entries = std::fs::read_dir(&resolved)
            .map_err(|err| ToolError::execution_error(err.to_string()))?;
        let mut files: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect();
        files.sort();

        Ok(if files.is_empty() {
            "(empty directory)".to_string()
        } else {
            files.join("\n")
        })
    }
}

impl Tool for ListFiles {
    fn definition(&self) -> ToolDefinition {
        tool_def::<ListFilesParams>("list_files", "List files in a directory.")
    }

    fn execute(
        &self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let params: ListFilesParams = parse_params(args)?;
            self.run(&params).map(Value::String)
        })
    }
}

/// Reads a text file.
#[derive(Debug, Clone)]
pub struct ReadFile {
    sandbox: Sandbox,
}

impl ReadFile {
    /// Creates the tool for a sandbox.
    #[must_use]
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

impl Tool for ReadFile {
    fn definition(&self) -> ToolDefinition {
        tool_def::<ReadFileParams>("read_file", "Read the contents of a file.")
    }

    fn execute(
        &self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let params: ReadFileParams = parse_params(args)?;
            let resolved = resolve(&self.sandbox, &params.path)?;
            std::fs::read_to_string(&resolved)
                .map(Value::String)
                .map_err(|err| ToolError::execution_error(err.to_string()))
        })
    }
}

/// Writes a text file, replacing any existing content.
#[derive(Debug, Clone)]
pub struct WriteFile {
    sandbox: Sandbox,
}

impl WriteFile {
    /// Creates the tool for a sandbox.
    #[must_use]
    pub fn new(sandbox: Sandbox) -> Self {
        Self { sandbox }
    }
}

impl Tool for WriteFile {
    fn definition(&self) -> ToolDefinition {
        tool_def::<WriteFileParams>("write_file", "Write content to a file.")
    }

    fn execute(
        &self,
        args: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Value, ToolError>> + Send + '_>> {
        Box::pin(async move {
            let params: WriteFileParams = parse_params(args)?;
            let resolved = resolve(&self.sandbox, &params.path)?;
            std::fs::write(&resolved, &params.content)
                .map_err(|err| ToolError::execution_error(err.to_string()))?;
            tracing::info!(path = %resolved.display(), bytes = params.content.len(), "wrote file");
            Ok(Value::String(format!("Wrote to {}", params.path)))
        })
    }
}

//! The backend contract.
//!
//! A [`Backend`] receives the rendered conversation, the prompt's tools and
//! the resolved output types, and answers with exactly one [`Completion`]:
//! a value of one of the output types, or a request to invoke a tool.

use crate::error::BackendError;
use crate::output::OutputType;
use async_trait::async_trait;
use serde_json::Value;
use sextant_models::llm::{Message, ToolCall, ToolDefinition};
use sextant_tools::{Tool, ToolError};
use std::sync::Arc;

/// Everything a backend needs to answer one prompt call.
#[derive(Debug, Clone)]
pub struct BackendRequest {
    /// The conversation; the rendered template is the first user message.
    pub messages: Vec<Message>,
    /// Tools the model may invoke instead of answering.
    pub tools: Vec<Arc<dyn Tool>>,
    /// Data types the model may answer with.
    pub output_types: Vec<OutputType>,
}

impl BackendRequest {
    /// Returns the tool with the given name.
    #[must_use]
    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    /// Returns the definitions of the offered tools.
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Returns the text of the first user message.
    #[must_use]
    pub fn prompt(&self) -> Option<String> {
        self.messages.iter().find_map(|message| match message {
            Message::User { .. } => Some(message.text()),
            Message::Assistant { .. } => None,
        })
    }
}

/// A backend's answer.
#[derive(Debug, Clone)]
pub enum Completion {
    /// A value of one of the requested output types.
    Data {
        /// Which output type the value belongs to.
        output_type: OutputType,
        /// The value in JSON form.
        value: Value,
    },
    /// A request to invoke one of the offered tools.
    ToolCall(ToolInvocation),
}

/// A tool chosen by the model, with the arguments it chose.
#[derive(Debug, Clone)]
pub struct ToolInvocation {
    /// Identifier linking the call to its result in a conversation.
    pub id: String,
    /// The tool, shared with the prompt's registry.
    pub tool: Arc<dyn Tool>,
    /// Arguments for the tool.
    pub arguments: Value,
}

impl ToolInvocation {
    /// Returns the tool name.
    #[must_use]
    pub fn name(&self) -> String {
        self.tool.name()
    }

    /// Runs the tool with the chosen arguments.
    ///
    /// # Errors
    ///
    /// Returns the tool's [`ToolError`].
    pub async fn execute(&self) -> Result<Value, ToolError> {
        self.tool.execute(self.arguments.clone()).await
    }

    /// Converts the invocation into the assistant-side tool call record.
    #[must_use]
    pub fn to_tool_call(&self) -> ToolCall {
        ToolCall::new(self.id.clone(), self.name(), self.arguments.clone())
    }
}

/// Performs inference for prompt functions.
///
/// # Example
///
/// ```
/// use sextant_prompt::{Backend, BackendError, BackendRequest, Completion, OutputType};
/// use sextant_prompt::async_trait;
///
/// /// Answers every prompt with its own text.
/// struct Echo;
///
/// #[async_trait]
/// impl Backend for Echo {
///     async fn complete(&self, request: BackendRequest) -> Result<Completion, BackendError> {
///         Ok(Completion::Data {
///             output_type: OutputType::data::<String>(),
///             value: request.prompt().unwrap_or_default().into(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Answers one request.
    async fn complete(&self, request: BackendRequest) -> Result<Completion, BackendError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Arc<B> {
    async fn complete(&self, request: BackendRequest) -> Result<Completion, BackendError> {
        (**self).complete(request).await
    }
}

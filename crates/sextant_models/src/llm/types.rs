//! Core types for LLM generation requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────
// Request / Response
// ─────────────────────

/// A generation request to a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System prompt for the model.
    pub system: Option<String>,
    /// The messages to send to the model.
    pub messages: Vec<Message>,
    /// Available tools the model can call.
    pub tools: Option<Vec<ToolDefinition>>,
    /// How the model should choose tools.
    pub tool_choice: Option<ToolChoice>,
    /// JSON Schema for structured output (optional).
    ///
    /// When provided, the model will generate output conforming to this schema.
    /// This is set automatically by `Llm::generate_with_schema()`.
    pub output_schema: Option<Value>,
}

impl GenerationRequest {
    /// Creates a new generation request with a user message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use sextant_models::llm::GenerationRequest;
    ///
    /// let request = GenerationRequest::new("What's the capital of Ireland?");
    /// ```
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_messages(vec![Message::user(message)])
    }

    /// Creates a new generation request from an existing conversation.
    #[must_use]
    pub fn from_messages(messages: Vec<Message>) -> Self {
        Self {
            system: None,
            messages,
            tools: None,
            tool_choice: None,
            output_schema: None,
        }
    }

    /// Sets the system prompt for the model.
    #[must_use]
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Adds a single tool to the request.
    ///
    /// This can be called multiple times to add multiple tools.
    #[must_use]
    pub fn tool(mut self, tool: ToolDefinition) -> Self {
        self.tools.get_or_insert_with(Vec::new).push(tool);
        self
    }

    /// Sets all available tools, replacing any previously added tools.
    ///
    /// An empty list clears the tools.
    #[must_use]
    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = if tools.is_empty() { None } else { Some(tools) };
        self
    }

    /// Sets how the model should choose tools.
    #[must_use]
    pub fn tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = Some(choice);
        self
    }

    /// Requires the model to call at least one tool.
    ///
    /// Shorthand for `.tool_choice(ToolChoice::Required)`.
    #[must_use]
    pub fn require_tool(mut self) -> Self {
        self.tool_choice = Some(ToolChoice::Required);
        self
    }
}

/// A generation response from a model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// The generated content blocks.
    pub content: Vec<AssistantBlock>,
    /// Token usage information.
    pub usage: Usage,
}

impl GenerationResponse {
    /// Returns all text content blocks concatenated into a single string.
    ///
    /// Returns an empty string if no text content is found.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                AssistantBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }

    /// Returns the tool calls in the response, in order.
    #[must_use]
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                AssistantBlock::ToolCall(call) => Some(call),
                _ => None,
            })
            .collect()
    }
}

/// Token usage information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    /// Number of tokens in the input.
    pub input_tokens: Option<u64>,
    /// Number of tokens in the output.
    pub output_tokens: Option<u64>,
    /// Total tokens (input + output).
    pub total_tokens: Option<u64>,
}

// ─────────────────────
// Messages
// ─────────────────────

/// An input (user) or output (assistant) message in a conversation. Each message contains at least one content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// A message from the user.
    User {
        /// The content blocks of the user message.
        content: Vec<UserBlock>,
    },
    /// A message from the assistant.
    Assistant {
        /// Optional identifier for this assistant.
        id: Option<String>,
        /// The content blocks of the assistant message.
        content: Vec<AssistantBlock>,
    },
}

impl Message {
    /// Creates a user message with text content.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::User {
            content: vec![UserBlock::Text(text.into())],
        }
    }

    /// Creates an assistant message with text content.
    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::Assistant {
            id: None,
            content: vec![AssistantBlock::Text(text.into())],
        }
    }

    /// Creates an assistant message holding a single tool call.
    #[must_use]
    pub fn assistant_tool_call(call: ToolCall) -> Self {
        Self::Assistant {
            id: None,
            content: vec![AssistantBlock::ToolCall(call)],
        }
    }

    /// Creates a user message with a tool result.
    #[must_use]
    pub fn tool_result(id: impl Into<String>, content: ToolResultContent) -> Self {
        Self::User {
            content: vec![UserBlock::tool_result(id, content)],
        }
    }

    /// Creates a user message with a tool error result.
    #[must_use]
    pub fn tool_error(id: impl Into<String>, content: ToolResultContent) -> Self {
        Self::User {
            content: vec![UserBlock::tool_error(id, content)],
        }
    }

    /// Returns the concatenated text blocks of this message.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::User { content } => content
                .iter()
                .filter_map(|block| match block {
                    UserBlock::Text(text) => Some(text.as_str()),
                    UserBlock::ToolResult(_) => None,
                })
                .collect::<Vec<_>>()
                .join(""),
            Self::Assistant { content, .. } => content
                .iter()
                .filter_map(|block| match block {
                    AssistantBlock::Text(text) => Some(text.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(""),
        }
    }
}

// ─────────────────────
// Content Blocks
// ─────────────────────

/// Content that can appear in a user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UserBlock {
    /// Plain text content.
    Text(String),
    /// A tool call result from execution.
    ToolResult(ToolResult),
}

impl UserBlock {
    /// Creates a text content block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a tool result content block.
    #[must_use]
    pub fn tool_result(id: impl Into<String>, content: ToolResultContent) -> Self {
        Self::ToolResult(ToolResult {
            id: id.into(),
            call_id: None,
            content,
            status: ToolResultStatus::Success,
        })
    }

    /// Creates an error tool result content block.
    #[must_use]
    pub fn tool_error(id: impl Into<String>, content: ToolResultContent) -> Self {
        Self::ToolResult(ToolResult {
            id: id.into(),
            call_id: None,
            content,
            status: ToolResultStatus::Error,
        })
    }
}

/// Content that can appear in an assistant message.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AssistantBlock {
    /// Plain text content.
    Text(String),
    /// A tool call request from the model.
    ToolCall(ToolCall),
    /// Reasoning/thinking content from the model.
    Reasoning(ReasoningBlock),
}

impl AssistantBlock {
    /// Creates a text content block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a tool call content block.
    #[must_use]
    pub fn tool_call(call: ToolCall) -> Self {
        Self::ToolCall(call)
    }
}

/// Reasoning/thinking content from extended thinking models.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReasoningBlock {
    /// Provider-assigned identifier for this reasoning block.
    pub id: Option<String>,
    /// The reasoning steps or thoughts.
    pub reasoning: Vec<String>,
    /// Signature for verification (required by some providers).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

// ─────────────────────
// Tool Calling
// ─────────────────────

/// Definition of a tool that can be called by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool (e.g., `get_weather`, `search_database`).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema defining the tool's parameters.
    ///
    /// This should be an object schema with properties defining each parameter.
    /// Example:
    /// ```json
    /// {
    ///   "type": "object",
    ///   "properties": {
    ///     "city": {"type": "string", "description": "City name"},
    ///     "units": {"type": "string", "enum": ["celsius", "fahrenheit"]}
    ///   },
    ///   "required": ["city"]
    /// }
    /// ```
    pub parameters: Value,
}

/// Controls how the model should select tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolChoice {
    /// Model decides whether to call tools or respond with text.
    Auto,
    /// Model must call at least one tool.
    Required,
    /// Model must call this specific tool.
    Specific(String),
    /// Model must not call any tools.
    None,
}

/// A tool call request from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call.
    pub id: String,
    /// Provider-specific call identifier.
    pub call_id: Option<String>,
    /// The function to call.
    pub function: ToolFunction,
}

impl ToolCall {
    /// Creates a tool call with the given id, function name and arguments.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            call_id: None,
            function: ToolFunction {
                name: name.into(),
                arguments,
            },
        }
    }
}

/// A tool function to be called.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolFunction {
    /// The name of the function to call.
    pub name: String,
    /// The arguments to pass to the function.
    pub arguments: Value,
}

/// Status of a tool result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolResultStatus {
    /// The tool executed successfully.
    #[default]
    Success,
    /// The tool encountered an error.
    Error,
}

/// Result of a tool call execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Identifier linking this result to the original tool call.
    pub id: String,
    /// Optional provider-specific call identifier.
    pub call_id: Option<String>,
    /// The result content.
    pub content: ToolResultContent,
    /// Whether this result represents a success or error.
    #[serde(default)]
    pub status: ToolResultStatus,
}

/// Content of a tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ToolResultContent {
    /// Text result.
    Text(String),
}

//! Anthropic [`LlmProvider`] implementation.

use super::client::AnthropicClient;
use super::types::{
    ContentBlock, ContentBlockParam, CreateMessageRequest, MessageParam, MessageResponse,
    OutputFormat, Role, ToolChoiceParam, ToolDef,
};
use crate::schema::normalize_schema_for_strict_mode;
use async_trait::async_trait;
use sextant_models::llm::{
    AssistantBlock, GenerationError, GenerationRequest, GenerationResponse, LlmProvider, Message,
    ReasoningBlock, ToolCall, ToolChoice, ToolFunction, ToolResultContent, ToolResultStatus, Usage,
    UserBlock,
};

/// Default maximum tokens for generation requests.
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic [`LlmProvider`] implementation.
#[derive(Debug, Clone)]
pub struct AnthropicProvider {
    client: AnthropicClient,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Creates a new provider.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: AnthropicClient::new(api_key),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Creates a provider that reads the API key from the specified environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Auth`] if the variable is unset or empty.
    pub fn from_env(env_var: &str) -> Result<Self, GenerationError> {
        match std::env::var(env_var) {
            Ok(api_key) if !api_key.trim().is_empty() => Ok(Self::new(api_key)),
            _ => Err(GenerationError::Auth(format!(
                "environment variable {env_var} is not set; set it to your Anthropic API key"
            ))),
        }
    }

    /// Overrides the API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.client = self.client.with_base_url(base_url);
        self
    }

    /// Overrides the maximum number of tokens generated per request.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    async fn generate(
        &self,
        model: &str,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        let anthropic_request = convert_request(model, self.max_tokens, &request)?;

        let response = self.client.create_message(&anthropic_request).await?;

        Ok(convert_response(response))
    }
}

fn convert_request(
    model: &str,
    max_tokens: u32,
    request: &GenerationRequest,
) -> Result<CreateMessageRequest, GenerationError> {
    if request.messages.is_empty() {
        return Err(GenerationError::InvalidRequest(
            "request must contain at least one message".to_string(),
        ));
    }

    let messages = request.messages.iter().map(convert_message).collect();

    let tools = request.tools.as_ref().map(|tools| {
        tools
            .iter()
            .map(|tool| ToolDef {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                input_schema: normalize_schema_for_strict_mode(tool.parameters.clone()),
                strict: Some(true),
            })
            .collect()
    });

    let tool_choice = request.tool_choice.as_ref().map(convert_tool_choice);

    let output_format = request
        .output_schema
        .as_ref()
        .map(|schema| OutputFormat::new(schema.clone()));

    Ok(CreateMessageRequest {
        model: model.to_string(),
        max_tokens,
        messages,
        system: request.system.clone(),
        tools,
        tool_choice,
        temperature: None,
        stop_sequences: None,
        output_format,
    })
}

fn convert_message(message: &Message) -> MessageParam {
    match message {
        Message::User { content } => MessageParam {
            role: Role::User,
            content: content.iter().map(convert_user_block).collect(),
        },
        Message::Assistant { content, .. } => MessageParam {
            role: Role::Assistant,
            content: content.iter().map(convert_assistant_block).collect(),
        },
    }
}

fn convert_user_block(block: &UserBlock) -> ContentBlockParam {
    match block {
        UserBlock::Text(text) => ContentBlockParam::Text { text: text.clone() },
        UserBlock::ToolResult(result) => {
            let ToolResultContent::Text(text) = &result.content;
            let is_error = match result.status {
                ToolResultStatus::Success => None,
                ToolResultStatus::Error => Some(true),
            };
            ContentBlockParam::ToolResult {
                tool_use_id: result.id.clone(),
                content: Some(text.clone()),
                is_error,
            }
        }
    }
}

fn convert_assistant_block(block: &AssistantBlock) -> ContentBlockParam {
    match block {
        AssistantBlock::Text(text) => ContentBlockParam::Text { text: text.clone() },
        AssistantBlock::ToolCall(call) => ContentBlockParam::ToolUse {
            id: call.id.clone(),
            name: call.function.name.clone(),
            input: call.function.arguments.clone(),
        },
        AssistantBlock::Reasoning(reasoning) => ContentBlockParam::Thinking {
            thinking: reasoning.reasoning.join("\n"),
            signature: reasoning.signature.clone().unwrap_or_default(),
        },
    }
}

fn convert_tool_choice(choice: &ToolChoice) -> ToolChoiceParam {
    match choice {
        ToolChoice::Auto => ToolChoiceParam::Auto {
            disable_parallel_tool_use: None,
        },
        // One answer per prompt call, so parallel calls are switched off.
        ToolChoice::Required => ToolChoiceParam::Any {
            disable_parallel_tool_use: Some(true),
        },
        ToolChoice::Specific(name) => ToolChoiceParam::Tool {
            name: name.clone(),
            disable_parallel_tool_use: Some(true),
        },
        ToolChoice::None => ToolChoiceParam::None,
    }
}

fn convert_response(response: MessageResponse) -> GenerationResponse {
    let content = response
        .content
        .into_iter()
        .filter_map(convert_content_block)
        .collect();

    GenerationResponse {
        content,
        usage: Usage {
            input_tokens: Some(response.usage.input_tokens),
            output_tokens: Some(response.usage.output_tokens),
            total_tokens: Some(response.usage.input_tokens + response.usage.output_tokens),
        },
    }
}

fn convert_content_block(block: ContentBlock) -> Option<AssistantBlock> {
    match block {
        ContentBlock::Text { text } => Some(AssistantBlock::Text(text)),
        ContentBlock::ToolUse { id, name, input } => Some(AssistantBlock::ToolCall(ToolCall {
            id,
            call_id: None,
            function: ToolFunction {
                name,
                arguments: input,
            },
        })),
        ContentBlock::Thinking {
            thinking,
            signature,
        } => Some(AssistantBlock::Reasoning(ReasoningBlock {
            id: None,
            reasoning: vec![thinking],
            signature: Some(signature),
        })),
        ContentBlock::RedactedThinking { .. } => None,
    }
}

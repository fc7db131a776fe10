//! Test doubles shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use serde_json::Value;
use sextant_models::llm::{Message, ToolResultContent, ToolResultStatus, UserBlock};
use sextant_prompt::{
    Backend, BackendError, BackendRequest, Completion, OutputType, ToolInvocation,
    async_trait,
};
use std::sync::{Arc, Mutex};

type Responder = dyn Fn(&BackendRequest) -> Result<Completion, BackendError> + Send + Sync;

/// A backend that answers with a closure and records every request.
pub struct ScriptedBackend {
    responder: Box<Responder>,
    requests: Mutex<Vec<BackendRequest>>,
}

impl ScriptedBackend {
    pub fn new(
        responder: impl Fn(&BackendRequest) -> Result<Completion, BackendError>
        + Send
        + Sync
        + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Always answers with the same JSON value of type `T`.
    pub fn answering<T: schemars::JsonSchema + 'static>(
        value: Value,
    ) -> Arc<Self> {
        Self::new(move |_| Ok(data::<T>(value.clone())))
    }

    /// Answers every prompt with its own rendered text.
    pub fn echo() -> Arc<Self> {
        Self::new(|request| Ok(data::<String>(request.prompt().unwrap_or_default().into())))
    }

    pub fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn complete(&self, request: BackendRequest) -> Result<Completion, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(&request)
    }
}

/// A data completion for `T`.
pub fn data<T: schemars::JsonSchema + 'static>(
    value: Value,
) -> Completion {
    Completion::Data {
        output_type: OutputType::data::<T>(),
        value,
    }
}

/// A tool-call completion for one of the request's tools.
pub fn tool_call(request: &BackendRequest, name: &str, arguments: Value) -> Completion {
    let tool = request.tool(name).expect("tool offered to the backend");
    Completion::ToolCall(ToolInvocation {
        id: format!("call_{}", request.messages.len()),
        tool: Arc::clone(tool),
        arguments,
    })
}

/// The most recent tool result in the conversation, with whether it was an error.
pub fn last_tool_result(request: &BackendRequest) -> Option<(String, bool)> {
    request.messages.iter().rev().find_map(|message| match message {
        Message::User { content } => content.iter().find_map(|block| match block {
            UserBlock::ToolResult(result) => {
                let ToolResultContent::Text(text) = &result.content;
                Some((text.clone(), result.status == ToolResultStatus::Error))
            }
            UserBlock::Text(_) => None,
        }),
        Message::Assistant { .. } => None,
    })
}

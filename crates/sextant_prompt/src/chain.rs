//! Prompt chains: prompt functions that run their own tool calls.
//!
//! A [`PromptChain`] calls the backend like a [`PromptFunction`], but when the
//! model asks for a tool it executes the tool, appends the call and its
//! result to the conversation, and asks again. It stops at the first data
//! answer or after [`max_iterations`](PromptChain::with_max_iterations)
//! backend calls.

use crate::backend::Completion;
use crate::error::PromptError;
use crate::function::PromptFunction;
use crate::output::PromptReturn;
use crate::signature::Arguments;
use serde_json::Value;
use sextant_models::llm::{Message, ToolResultContent};

/// Default bound on backend calls per chain invocation.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

/// A prompt function that resolves tool calls until the model answers.
#[derive(Debug)]
pub struct PromptChain<R> {
    function: PromptFunction<R>,
    max_iterations: usize,
}

impl<R: PromptReturn> PromptChain<R> {
    /// Wraps a prompt function.
    #[must_use]
    pub fn new(function: PromptFunction<R>) -> Self {
        Self {
            function,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the maximum number of backend calls per invocation.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns the maximum number of backend calls per invocation.
    #[must_use]
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Returns the wrapped prompt function.
    #[must_use]
    pub fn function(&self) -> &PromptFunction<R> {
        &self.function
    }

    /// Binds the arguments and renders the template without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Binding`] or [`PromptError::Placeholder`].
    pub fn render(&self, args: Arguments) -> Result<String, PromptError> {
        self.function.render(args)
    }

    /// Calls the chain.
    ///
    /// Tool failures are reported back to the model as error results rather
    /// than ending the chain.
    ///
    /// # Errors
    ///
    /// Returns a [`PromptError`] if binding, rendering or the backend fails,
    /// if the final answer does not match `R`, or
    /// [`PromptError::IterationLimit`] if no answer arrives in time.
    pub async fn call(&self, args: Arguments) -> Result<R, PromptError> {
        let mut request = self.function.request(args)?;
        let backend = self.function.backend();
        let accepts_tool_calls = R::return_type().has_tool_call();

        for iteration in 1..=self.max_iterations {
            let completion = backend.complete(request.clone()).await?;

            let invocation = match completion {
                Completion::ToolCall(invocation) if !accepts_tool_calls => invocation,
                completion => return Ok(R::from_completion(completion)?),
            };

            tracing::debug!(
                prompt = %self.function.name(),
                iteration,
                tool = %invocation.name(),
                "executing tool requested by model"
            );

            request
                .messages
                .push(Message::assistant_tool_call(invocation.to_tool_call()));
            match invocation.execute().await {
                Ok(output) => request.messages.push(Message::tool_result(
                    invocation.id.clone(),
                    ToolResultContent::Text(output_text(&output)),
                )),
                Err(err) => {
                    tracing::debug!(
                        prompt = %self.function.name(),
                        tool = %invocation.name(),
                        error = %err,
                        "tool failed; returning error to model"
                    );
                    request.messages.push(Message::tool_error(
                        invocation.id.clone(),
                        ToolResultContent::Text(err.to_string()),
                    ));
                }
            }
        }

        Err(PromptError::IterationLimit {
            limit: self.max_iterations,
        })
    }
}

impl<R> core::ops::Deref for PromptChain<R> {
    type Target = PromptFunction<R>;

    fn deref(&self) -> &Self::Target {
        &self.function
    }
}

fn output_text(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

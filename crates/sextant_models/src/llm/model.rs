//! LLM handle for generation requests.

use super::error::{ExtractionError, GenerationError};
use super::provider::LlmProvider;
use super::types::{GenerationRequest, GenerationResponse};
use serde_json::Value;
use std::sync::Arc;

/// An LLM handle for making generation requests.
///
/// Created via [`ModelRegistry::llm()`](crate::ModelRegistry::llm).
#[derive(Clone)]
pub struct Llm {
    provider: Arc<dyn LlmProvider>,
    model: String,
}

impl core::fmt::Debug for Llm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Llm").field("model", &self.model).finish()
    }
}

impl Llm {
    /// Creates a new LLM handle from provider and model name.
    #[must_use]
    pub(crate) fn new(provider: Arc<dyn LlmProvider>, model: String) -> Self {
        Self { provider, model }
    }

    /// Sends a generation request to the model.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the request fails.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GenerationResponse, GenerationError> {
        self.provider.generate(&self.model, request).await
    }

    /// Sends a generation request constrained to a JSON schema.
    ///
    /// The schema is injected as the request's output schema and the text of
    /// the response is parsed as JSON.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] if:
    /// - The generation request fails
    /// - No text content is found in the response
    /// - The response text is not valid JSON
    pub async fn generate_with_schema(
        &self,
        mut request: GenerationRequest,
        schema: Value,
    ) -> Result<Value, ExtractionError> {
        request.output_schema = Some(schema);

        let response = self.generate(request).await?;

        let text = response.text();
        if text.is_empty() {
            return Err(ExtractionError::NoContent);
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Returns the model name (without provider prefix).
    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

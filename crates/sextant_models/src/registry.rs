//! Model provider registry.

use crate::error::CreateModelError;
use crate::llm::{Llm, LlmProvider};
use std::collections::HashMap;
use std::sync::Arc;

/// Registry for model provider implementations.
///
/// # For Consumers
///
/// Access models using provider/model identifiers (e.g., `"anthropic/claude-sonnet-4-5-20250929"`).
/// See [`llm()`](Self::llm) for details.
///
/// # For Provider Authors
///
/// Providers are registered once, by name, before any handle is requested:
///
/// ```
/// # use sextant_models::ModelRegistry;
/// # use sextant_models::llm::{LlmProvider, GenerationRequest, GenerationResponse, GenerationError};
/// # use async_trait::async_trait;
/// # use std::sync::Arc;
/// # struct MyProvider;
/// # #[async_trait]
/// # impl LlmProvider for MyProvider {
/// #   async fn generate(&self, _model: &str, _request: GenerationRequest) -> Result<GenerationResponse, GenerationError> {
/// #     unimplemented!()
/// #   }
/// # }
/// let mut registry = ModelRegistry::new();
/// registry.register_llm_provider("my_provider", Arc::new(MyProvider));
///
/// let llm = registry.llm("my_provider/some-model").unwrap();
/// assert_eq!(llm.model_name(), "some-model");
/// ```
#[derive(Default, Clone)]
pub struct ModelRegistry {
    // Maps provider names to implementations.
    llm_providers: HashMap<String, Arc<dyn LlmProvider>>,
}

impl core::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("llm_providers", &self.llm_provider_names())
            .finish()
    }
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            llm_providers: HashMap::new(),
        }
    }

    /// Creates a handle to an [`Llm`].
    ///
    /// # Arguments
    ///
    /// * `model_id` - Identifier in `"provider/model"` format (e.g., `"anthropic/claude-sonnet-4-5-20250929"`)
    ///
    /// # Errors
    ///
    /// Returns an error if the `model_id` structure is invalid or the provider is not registered.
    pub fn llm(&self, model_id: impl AsRef<str>) -> Result<Llm, CreateModelError> {
        let model_id = model_id.as_ref();

        let (provider_name, model_name) = model_id
            .split_once('/')
            .filter(|(provider, model)| !provider.is_empty() && !model.is_empty())
            .ok_or_else(|| CreateModelError::InvalidModelId(model_id.to_string()))?;

        let provider = self
            .get_llm_provider(provider_name)
            .ok_or_else(|| CreateModelError::UnknownProvider(provider_name.to_string()))?;

        Ok(Llm::new(provider, model_name.to_string()))
    }

    /// Registers an LLM provider.
    ///
    /// # Arguments
    ///
    /// * `name` - Provider name used in identifiers (e.g., `"anthropic"` for `"anthropic/claude-sonnet-4-5-20250929"`)
    /// * `provider` - The provider implementation
    ///
    /// # Panics
    ///
    /// Panics if a provider with the same name is already registered.
    pub fn register_llm_provider<P: LlmProvider>(
        &mut self,
        name: impl Into<String>,
        provider: Arc<P>,
    ) {
        if let Err(err) = self.try_register_llm_provider(name, provider) {
            panic!("{err}");
        }
    }

    /// Registers an LLM provider, returning an error on a name conflict.
    ///
    /// # Errors
    ///
    /// Returns [`CreateModelError::DuplicateProvider`] if the name is taken.
    pub fn try_register_llm_provider<P: LlmProvider>(
        &mut self,
        name: impl Into<String>,
        provider: Arc<P>,
    ) -> Result<(), CreateModelError> {
        let name = name.into();
        if self.llm_providers.contains_key(&name) {
            return Err(CreateModelError::DuplicateProvider(name));
        }
        self.llm_providers
            .insert(name, provider as Arc<dyn LlmProvider>);
        Ok(())
    }

    /// Returns a provider by name.
    #[must_use]
    pub fn get_llm_provider(&self, name: impl AsRef<str>) -> Option<Arc<dyn LlmProvider>> {
        self.llm_providers.get(name.as_ref()).cloned()
    }

    /// Checks if a provider is registered.
    #[must_use]
    pub fn has_llm_provider(&self, name: impl AsRef<str>) -> bool {
        self.llm_providers.contains_key(name.as_ref())
    }

    /// Lists registered provider names.
    #[must_use]
    pub fn llm_provider_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.llm_providers.keys().cloned().collect();
        names.sort();
        names
    }
}

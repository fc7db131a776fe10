//! The prompt invoker.

use crate::backend::{Backend, BackendRequest};
use crate::error::PromptError;
use crate::output::{OutputType, PromptReturn};
use crate::signature::{Arguments, Signature};
use crate::template::Template;
use sextant_models::llm::{Message, ToolDefinition};
use sextant_tools::{Tool, ToolRegistry};
use std::marker::PhantomData;
use std::sync::Arc;

/// Identity of the declaration a prompt function was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptMetadata {
    /// The declared function name.
    pub name: String,
    /// The cleaned documentation text.
    pub doc: Option<String>,
}

/// A function whose body is a template answered by a [`Backend`].
///
/// Built once by [`PromptBuilder`](crate::PromptBuilder) or `#[prompt]` and
/// immutable afterwards. Every call binds its own arguments, renders the
/// template and sends one request to the backend, so one instance can be
/// shared freely between tasks.
pub struct PromptFunction<R> {
    metadata: PromptMetadata,
    signature: Signature,
    template: Template,
    tools: ToolRegistry,
    return_types: Vec<OutputType>,
    backend: Arc<dyn Backend>,
    _output: PhantomData<fn() -> R>,
}

impl<R> core::fmt::Debug for PromptFunction<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PromptFunction")
            .field("name", &self.metadata.name)
            .field("template", &self.template.source())
            .field("parameters", &self.signature.parameters().len())
            .field("tools", &self.tools)
            .field("return_types", &self.return_types)
            .finish_non_exhaustive()
    }
}

impl<R: PromptReturn> PromptFunction<R> {
    /// Assembles a prompt function without identity metadata.
    pub(crate) fn new(
        signature: Signature,
        template: Template,
        tools: ToolRegistry,
        backend: Arc<dyn Backend>,
    ) -> Self {
        let return_types = signature.return_type().resolve();
        Self {
            metadata: PromptMetadata::default(),
            signature,
            template,
            tools,
            return_types,
            backend,
            _output: PhantomData,
        }
    }

    /// Copies the declaration's identity onto the invoker.
    #[must_use]
    pub(crate) fn with_metadata(mut self, metadata: PromptMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Binds the arguments and renders the template without contacting the backend.
    ///
    /// # Errors
    ///
    /// Returns [`PromptError::Binding`] or [`PromptError::Placeholder`].
    pub fn render(&self, args: Arguments) -> Result<String, PromptError> {
        let bound = self.signature.bind(args).inspect_err(|err| {
            tracing::debug!(prompt = %self.metadata.name, error = %err, "argument binding failed");
        })?;
        let rendered = self.template.render(&bound).inspect_err(|err| {
            tracing::debug!(prompt = %self.metadata.name, error = %err, "template rendering failed");
        })?;
        Ok(rendered)
    }

    /// Calls the prompt function.
    ///
    /// Binding and rendering happen before the backend is contacted; if
    /// either fails the backend never sees the call.
    ///
    /// # Errors
    ///
    /// Returns a [`PromptError`] if binding, rendering or the backend fails,
    /// or if the backend's answer does not match `R`.
    pub async fn call(&self, args: Arguments) -> Result<R, PromptError> {
        let request = self.request(args)?;
        let completion = self.backend.complete(request).await?;
        Ok(R::from_completion(completion)?)
    }

    /// Builds the backend request for one call.
    pub(crate) fn request(&self, args: Arguments) -> Result<BackendRequest, PromptError> {
        let prompt = self.render(args)?;

        tracing::debug!(
            prompt = %self.metadata.name,
            rendered_len = prompt.len(),
            tools = self.tools.len(),
            output_types = self.return_types.len(),
            "calling prompt function"
        );

        Ok(BackendRequest {
            messages: vec![Message::user(prompt)],
            tools: self.tools.tools(),
            output_types: self.return_types.clone(),
        })
    }
}

impl<R> PromptFunction<R> {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    /// Returns the declaration's documentation, if any.
    #[must_use]
    pub fn doc(&self) -> Option<&str> {
        self.metadata.doc.as_deref()
    }

    /// Returns the declaration's identity metadata.
    #[must_use]
    pub fn metadata(&self) -> &PromptMetadata {
        &self.metadata
    }

    /// Returns the signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Returns the template.
    #[must_use]
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Returns a copy of the registered tools, in declaration order.
    #[must_use]
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.tools()
    }

    /// Returns the definitions of the registered tools.
    #[must_use]
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.definitions()
    }

    /// Returns a copy of the data types the backend may answer with.
    #[must_use]
    pub fn return_types(&self) -> Vec<OutputType> {
        self.return_types.clone()
    }

    /// Returns the backend handle.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }
}

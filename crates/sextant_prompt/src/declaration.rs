//! Building prompt functions from declarations.
//!
//! [`PromptBuilder`] is what the `#[prompt]` and `#[prompt_chain]` macros
//! expand to, and can be used directly when a prompt is assembled at runtime.
//!
//! ```
//! use sextant_prompt::{Arguments, Parameter, PromptBuilder};
//!
//! let add = PromptBuilder::<i64>::new("add")
//!     .doc("Add {a} and {b}")
//!     .param(Parameter::new("a"))
//!     .param(Parameter::new("b").with_default(0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(add.render(Arguments::new().kwarg("a", 5)).unwrap(), "Add 5 and 0");
//! ```

use crate::backend::Backend;
use crate::chain::PromptChain;
use crate::error::DeclarationError;
use crate::function::{PromptFunction, PromptMetadata};
use crate::llm_backend::DefaultBackend;
use crate::output::PromptReturn;
use crate::signature::{Parameter, Signature};
use crate::template::Template;
use sextant_tools::{Tool, ToolError, ToolRegistry};
use std::marker::PhantomData;
use std::sync::Arc;

/// Collects a prompt declaration and validates it into a [`PromptFunction`].
pub struct PromptBuilder<R> {
    name: String,
    doc: Option<String>,
    template: Option<String>,
    parameters: Vec<Parameter>,
    tools: Vec<Arc<dyn Tool>>,
    backend: Option<Arc<dyn Backend>>,
    _output: PhantomData<fn() -> R>,
}

impl<R> core::fmt::Debug for PromptBuilder<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PromptBuilder")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("parameters", &self.parameters)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl<R: PromptReturn> PromptBuilder<R> {
    /// Starts a declaration with the given function name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            template: None,
            parameters: Vec::new(),
            tools: Vec::new(),
            backend: None,
            _output: PhantomData,
        }
    }

    /// Sets the documentation text, used as the template when none is given.
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Sets an explicit template. A blank template counts as none, so the
    /// documentation is used instead.
    #[must_use]
    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Appends several parameters.
    #[must_use]
    pub fn params(mut self, parameters: impl IntoIterator<Item = Parameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// Offers a tool to the model.
    #[must_use]
    pub fn function(self, tool: impl Tool) -> Self {
        self.shared_function(Arc::new(tool))
    }

    /// Offers an already shared tool to the model.
    #[must_use]
    pub fn shared_function(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    /// Sets the backend. Defaults to [`DefaultBackend`].
    #[must_use]
    pub fn model(self, backend: impl Backend) -> Self {
        self.shared_model(Arc::new(backend))
    }

    /// Sets an already shared backend.
    #[must_use]
    pub fn shared_model(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validates the declaration and builds the prompt function.
    ///
    /// # Errors
    ///
    /// Returns a [`DeclarationError`] if there is no template, the template
    /// or parameter list is malformed, a tool name repeats, or the return
    /// type accepts no data while no tools are registered.
    pub fn build(self) -> Result<PromptFunction<R>, DeclarationError> {
        let name = self.name;
        let doc = self.doc.as_deref().and_then(clean_doc);

        let explicit = self
            .template
            .filter(|template| !template.trim().is_empty());
        let template_text = match explicit {
            Some(template) => template,
            None => doc.clone().ok_or_else(|| DeclarationError::MissingTemplate {
                function: name.clone(),
            })?,
        };
        let template =
            Template::parse(template_text).map_err(|source| DeclarationError::Template {
                function: name.clone(),
                source,
            })?;

        let signature = Signature::new(self.parameters, R::return_type())?;
        for placeholder in template.placeholders() {
            if signature.parameter(placeholder).is_none() {
                tracing::warn!(
                    prompt = %name,
                    placeholder,
                    "template placeholder does not match any parameter"
                );
            }
        }

        let mut tools = ToolRegistry::new();
        for tool in self.tools {
            tools
                .try_register_shared(tool)
                .map_err(|err| DeclarationError::DuplicateTool {
                    function: name.clone(),
                    tool: match err {
                        ToolError::DuplicateTool(tool) => tool,
                        other => other.to_string(),
                    },
                })?;
        }

        if signature.return_type().resolve().is_empty() && tools.is_empty() {
            return Err(DeclarationError::NoOutputTypes { function: name });
        }

        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(DefaultBackend::new()));

        let function = PromptFunction::new(signature, template, tools, backend);

        tracing::debug!(
            prompt = %name,
            parameters = function.signature().parameters().len(),
            tools = function.tools().len(),
            output_types = function.return_types().len(),
            "declared prompt function"
        );

        Ok(function.with_metadata(PromptMetadata { name, doc }))
    }

    /// Validates the declaration and builds a [`PromptChain`].
    ///
    /// # Errors
    ///
    /// As [`build`](Self::build), and additionally
    /// [`DeclarationError::NoOutputTypes`] if the return type accepts no data,
    /// since a chain can only finish with a data answer.
    pub fn build_chain(self) -> Result<PromptChain<R>, DeclarationError> {
        if R::return_type().resolve().is_empty() {
            return Err(DeclarationError::NoOutputTypes {
                function: self.name,
            });
        }
        self.build().map(PromptChain::new)
    }
}

/// Cleans documentation text for use as a template.
///
/// Strips the first line's leading whitespace and removes the indentation
/// common to the remaining non-blank lines, along with trailing whitespace
/// and leading and trailing blank lines. Returns `None` if nothing remains.
#[must_use]
pub fn clean_doc(doc: &str) -> Option<String> {
    let lines: Vec<&str> = doc.lines().map(str::trim_end).collect();
    let indent = lines
        .iter()
        .skip(1)
        .filter(|line| !line.is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let dedented: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            if index == 0 {
                line.trim_start()
            } else {
                line.get(indent..).unwrap_or_else(|| line.trim_start())
            }
        })
        .collect();

    let start = dedented.iter().position(|line| !line.is_empty())?;
    let end = dedented.iter().rposition(|line| !line.is_empty())?;
    Some(dedented[start..=end].join("\n"))
}

//! Error types for prompt declaration and invocation.
//!
//! Declaration-time problems surface as [`DeclarationError`] from
//! [`PromptBuilder::build`](crate::PromptBuilder::build). Everything that can
//! go wrong during a call is collected in [`PromptError`].

use sextant_models::llm::{ExtractionError, GenerationError};
use sextant_tools::ToolError;
use thiserror::Error;

/// Errors raised while turning a declaration into a prompt function.
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// Neither an explicit template nor documentation text was given.
    #[error("prompt function '{function}' has no template and no documentation to use as one")]
    MissingTemplate {
        /// Name of the declaration.
        function: String,
    },

    /// The template text could not be parsed.
    #[error("invalid template for prompt function '{function}': {source}")]
    Template {
        /// Name of the declaration.
        function: String,
        /// The parse failure.
        #[source]
        source: TemplateError,
    },

    /// The parameter list is not a valid signature.
    #[error(transparent)]
    Signature(#[from] SignatureError),

    /// Two tools share a name.
    #[error("prompt function '{function}' registers tool '{tool}' more than once")]
    DuplicateTool {
        /// Name of the declaration.
        function: String,
        /// The repeated tool name.
        tool: String,
    },

    /// The return type accepts no data and no tools are registered.
    #[error("prompt function '{function}' has no output types and no tools")]
    NoOutputTypes {
        /// Name of the declaration.
        function: String,
    },
}

/// Invalid parameter lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A parameter name is empty.
    #[error("parameter names must not be empty")]
    EmptyName,

    /// Two parameters share a name.
    #[error("duplicate parameter '{name}'")]
    DuplicateParameter {
        /// The repeated name.
        name: String,
    },

    /// Parameter kinds are not ordered positional-only, positional-or-keyword, keyword-only.
    #[error("parameter '{name}' is out of order for its kind")]
    KindOrder {
        /// The misplaced parameter.
        name: String,
    },

    /// A required positional parameter follows one with a default.
    #[error("parameter '{name}' without a default follows a parameter with a default")]
    NonDefaultAfterDefault {
        /// The offending parameter.
        name: String,
    },
}

/// Call arguments that do not fit the signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// A required parameter received no value.
    #[error("missing required argument '{name}'")]
    MissingArgument {
        /// The parameter name.
        name: String,
    },

    /// A positional argument targets a parameter already bound by keyword.
    #[error("positional argument follows keyword argument '{name}'")]
    PositionalAfterKeyword {
        /// The parameter bound by keyword.
        name: String,
    },

    /// No parameter has this name.
    #[error("unexpected keyword argument '{name}'")]
    UnknownKeyword {
        /// The unknown name.
        name: String,
    },

    /// More positional arguments than positional parameters.
    #[error("takes {expected} positional arguments but {got} were given")]
    TooManyPositional {
        /// Number of parameters that accept positional arguments.
        expected: usize,
        /// Number of positional arguments supplied.
        got: usize,
    },

    /// A parameter received a value twice.
    #[error("got multiple values for argument '{name}'")]
    MultipleValues {
        /// The parameter name.
        name: String,
    },

    /// A positional-only parameter was passed by keyword.
    #[error("positional-only argument '{name}' passed as keyword")]
    PositionalOnlyAsKeyword {
        /// The parameter name.
        name: String,
    },

    /// A typed argument could not be converted to JSON.
    #[error("argument '{name}' cannot be serialized: {reason}")]
    Unserializable {
        /// The parameter name.
        name: String,
        /// The serializer's message.
        reason: String,
    },
}

/// Malformed template text, detected when the template is parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{` has no matching `}`.
    #[error("unclosed '{{' at byte {position}")]
    Unclosed {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// A lone `}` outside a placeholder.
    #[error("single '}}' at byte {position}; use '}}}}' for a literal brace")]
    UnmatchedClose {
        /// Byte offset of the brace.
        position: usize,
    },

    /// `{}` with nothing inside.
    #[error("empty placeholder at byte {position}")]
    EmptyPlaceholder {
        /// Byte offset of the opening brace.
        position: usize,
    },

    /// Conversion (`!r`) or format (`:>10`) specifiers are not supported.
    #[error("placeholder '{{{placeholder}}}' uses an unsupported conversion or format specifier")]
    UnsupportedSpecifier {
        /// The placeholder text.
        placeholder: String,
    },

    /// The placeholder is not a name followed by field or index accessors.
    #[error("invalid placeholder '{{{placeholder}}}'")]
    InvalidPlaceholder {
        /// The placeholder text.
        placeholder: String,
    },
}

/// A placeholder that cannot be filled from the bound arguments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceholderError {
    /// The template names an argument that is not bound.
    #[error("template placeholder '{name}' is not bound to an argument")]
    Unbound {
        /// The missing argument name.
        name: String,
    },

    /// A field or index path does not exist on the bound value.
    #[error("template placeholder '{placeholder}' refers to a missing field")]
    MissingField {
        /// The full placeholder text.
        placeholder: String,
    },
}

/// The backend's answer does not match the declared return type.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The backend produced a value of an undeclared type.
    #[error("backend returned '{got}', expected one of: {expected}")]
    UnexpectedType {
        /// Names of the accepted output types.
        expected: String,
        /// Name of the type the backend produced.
        got: String,
    },

    /// The backend asked for a tool call but the return type has no tool-call member.
    #[error("backend requested tool '{tool}' but the return type does not accept tool calls")]
    UnexpectedToolCall {
        /// The requested tool.
        tool: String,
    },

    /// The return type only accepts tool calls but the backend returned data.
    #[error("backend returned '{got}' but only a tool call is accepted")]
    ExpectedToolCall {
        /// Name of the type the backend produced.
        got: String,
    },

    /// The value could not be deserialized into the output type.
    #[error("failed to deserialize backend output as '{type_name}': {source}")]
    Deserialize {
        /// Name of the output type.
        type_name: String,
        /// The deserializer's error.
        #[source]
        source: serde_json::Error,
    },
}

/// Errors produced by a [`Backend`](crate::Backend).
#[derive(Debug, Error)]
pub enum BackendError {
    /// The model request failed.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A structured output request failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The model asked for a tool that was not offered.
    #[error("model requested unknown tool '{0}'")]
    UnknownTool(String),

    /// The model's answer fits none of the offered output types.
    #[error("model returned invalid output: {0}")]
    InvalidOutput(String),

    /// The backend could not be configured.
    #[error("backend configuration error: {0}")]
    Config(String),

    /// Any other backend failure.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl BackendError {
    /// Wraps an arbitrary error as [`BackendError::Other`].
    pub fn other(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Other(err.into())
    }
}

/// Errors returned by a prompt function call.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The call's arguments do not fit the signature.
    #[error(transparent)]
    Binding(#[from] BindingError),

    /// The template could not be rendered.
    #[error(transparent)]
    Placeholder(#[from] PlaceholderError),

    /// The backend failed; passed through unchanged.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The backend's answer does not match the return type.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// A prompt chain kept requesting tools.
    #[error("prompt chain did not produce an answer within {limit} iterations")]
    IterationLimit {
        /// The configured iteration bound.
        limit: usize,
    },

    /// A tool failed while being executed on the caller's behalf.
    #[error(transparent)]
    Tool(#[from] ToolError),
}

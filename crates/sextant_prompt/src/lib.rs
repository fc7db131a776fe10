//! Prompt functions for Sextant.
//!
//! A prompt function is a function whose body is a template. Calling it binds
//! the arguments to the declared parameters, renders the template and asks a
//! [`Backend`] for a value of the declared return type. The backend may
//! instead ask for one of the prompt's tools to be invoked, which the caller
//! sees as a [`FunctionCall`], or which a [`PromptChain`] executes itself.
//!
//! # Quick Start
//!
//! ```no_run
//! use sextant_prompt::prelude::*;
//!
//! #[prompt("Add {a} and {b}")]
//! fn add(a: i64, #[default(0)] b: i64) -> i64 {}
//!
//! # async fn run() -> Result<(), PromptError> {
//! let sum = add().call(5, Some(3)).await?;
//! # let _ = sum;
//! # Ok(())
//! # }
//! ```
//!
//! The same prompt can be assembled at runtime with [`PromptBuilder`]:
//!
//! ```
//! use sextant_prompt::{Arguments, Parameter, PromptBuilder};
//!
//! let add = PromptBuilder::<i64>::new("add")
//!     .template("Add {a} and {b}")
//!     .param(Parameter::new("a"))
//!     .param(Parameter::new("b").with_default(0))
//!     .build()
//!     .unwrap();
//!
//! let rendered = add.render(Arguments::new().arg(5).arg(3)).unwrap();
//! assert_eq!(rendered, "Add 5 and 3");
//! ```
//!
//! # Architecture
//!
//! - [`Signature`] / [`Arguments`]: parameter schema and argument binding
//! - [`Template`]: placeholder parsing and rendering
//! - [`ReturnType`] / [`PromptReturn`]: output types a backend may answer with
//! - [`PromptFunction`]: the invoker
//! - [`PromptBuilder`]: validates declarations into invokers
//! - [`Backend`]: the inference contract; [`LlmBackend`] and
//!   [`DefaultBackend`] implement it over `sextant_models`

// Self-reference so `#[prompt]`-generated code can use `sextant_prompt::` paths within this crate.
extern crate self as sextant_prompt;

pub mod backend;
pub mod chain;
pub mod declaration;
pub mod error;
pub mod function;
pub mod llm_backend;
pub mod output;
pub mod signature;
pub mod template;

pub use backend::{Backend, BackendRequest, Completion, ToolInvocation};
pub use chain::{DEFAULT_MAX_ITERATIONS, PromptChain};
pub use declaration::{PromptBuilder, clean_doc};
pub use error::{
    BackendError, BindingError, DeclarationError, OutputError, PlaceholderError, PromptError,
    SignatureError, TemplateError,
};
pub use function::{PromptFunction, PromptMetadata};
pub use llm_backend::{
    API_KEY_VAR_ENV_VAR, BackendConfig, DEFAULT_API_KEY_VAR, DEFAULT_MODEL, DefaultBackend,
    LlmBackend, MODEL_ENV_VAR, RETURN_TOOL_PREFIX,
};
pub use output::{Either, FunctionCall, OutputKind, OutputType, PromptReturn, ReturnType};
pub use signature::{
    Argument, Arguments, BoundArguments, ParamKind, Parameter, Signature, to_argument,
};
pub use template::Template;

pub use async_trait::async_trait;
pub use prompt_macros::{prompt, prompt_chain};

/// Everything needed to declare and call prompt functions.
pub mod prelude {
    pub use crate::{
        Arguments, Backend, BackendError, BackendRequest, Completion, DeclarationError, Either,
        FunctionCall, OutputType, Parameter, PromptBuilder, PromptChain, PromptError,
        PromptFunction, async_trait, prompt, prompt_chain,
    };
    pub use sextant_tools::{Tool, ToolError, tool};
}

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

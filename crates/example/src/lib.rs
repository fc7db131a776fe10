//! Example file assistant built with Sextant.
//!
//! The assistant is two prompt functions:
//!
//! - [`classify`], a `#[prompt]` that sorts a request into a [`RequestKind`]
//!   with a structured answer;
//! - [`file_assistant`], a [`PromptChain`] assembled at runtime that offers
//!   sandboxed file tools and runs them until the model answers.
//!
//! ```text
//! request ──▶ classify ──▶ RequestKind
//!    │
//!    └──────▶ file_assistant ──▶ model ──▶ tool call ──▶ list/read/write
//!                   ▲                          │
//!                   └──────── tool result ◀────┘
//! ```

mod sandbox;
pub mod tools;

pub use sandbox::Sandbox;

use schemars::JsonSchema;
use serde::Deserialize;
use sextant::prelude::*;
use tools::{ListFiles, ReadFile, WriteFile};

/// Iteration bound for the assistant's tool loop.
pub const MAX_STEPS: usize = 10;

/// What a request asks the assistant to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Look at what files exist.
    List,
    /// Read or summarize file contents.
    Read,
    /// Create or change files.
    Write,
    /// Anything else.
    Other,
}

/// Classify this request to a file assistant by what it needs done
/// to the files: list them, read them, write them, or something else.
///
/// Request: {request}
#[prompt]
pub fn classify(
    /// The user's request.
    request: String,
) -> RequestKind {
}

/// Builds the file assistant for a sandbox.
///
/// # Errors
///
/// Returns a [`DeclarationError`] if the declaration is invalid.
pub fn file_assistant(sandbox: &Sandbox) -> Result<PromptChain<String>, DeclarationError> {
    PromptBuilder::new("file_assistant")
        .doc(
            "You are a file assistant working in a sandboxed directory.\n\
             Use the tools to inspect or change files, then answer briefly.\n\
             \n\
             Request: {request}",
        )
        .param(Parameter::new("request").with_description("The user's request."))
        .function(ListFiles::new(sandbox.clone()))
        .function(ReadFile::new(sandbox.clone()))
        .function(WriteFile::new(sandbox.clone()))
        .build_chain()
        .map(|chain| chain.with_max_iterations(MAX_STEPS))
}

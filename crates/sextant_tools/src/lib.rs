//! Tool framework for Sextant prompt functions.
//!
//! Tools are async functions the model may ask to invoke instead of
//! answering directly. Each tool exposes a JSON schema for its arguments
//! and is shared by reference between the [`ToolRegistry`] of a prompt and
//! the backend that offers it to the model.
//!
//! # Quick Start
//!
//! ```
//! use sextant_tools::{tool, ToolError, ToolRegistry};
//!
//! #[tool]
//! /// Search for documents matching a query.
//! async fn search(
//!     /// The search query.
//!     query: String,
//!     /// Max results to return.
//!     #[default(10)]
//!     limit: usize,
//! ) -> Result<String, ToolError> {
//!     Ok(format!("Found {limit} results for: {query}"))
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(search());
//! assert!(registry.has("search"));
//! ```
//!
//! # Architecture
//!
//! - [`Tool`]: trait for executable tools with JSON schema
//! - [`ToolRegistry`]: ordered, name-keyed tool storage
//! - [`FunctionParam`] / [`InputParam`]: parameter extraction
//! - [`FunctionMetadata`] / [`ParameterInfo`]: schema building

// Self-reference so `#[tool]`-generated code can use `sextant_tools::` paths within this crate.
extern crate self as sextant_tools;

pub mod error;
pub mod param;
pub mod registry;
pub mod schema;
pub mod tool;

pub use error::ToolError;
pub use param::{FunctionParam, InputParam, ToolArgs};
pub use registry::ToolRegistry;
pub use schema::{FunctionMetadata, ParameterInfo};
pub use tool::Tool;

pub use sextant_models::llm::ToolDefinition;

pub use tool_macros::tool;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}

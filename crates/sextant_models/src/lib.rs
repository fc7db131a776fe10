//! Model provider interface and registry for Sextant.
//!
//! Prompt functions talk to language models through the types in this crate,
//! never through a concrete provider.
//!
//! # Overview
//!
//! - Provider-agnostic: the prompt layer depends only on [`llm::LlmProvider`]
//!   and the request/response types in [`llm`].
//!
//! - Swappable providers: providers are registered by name in a
//!   [`ModelRegistry`] and addressed with `"provider/model"` identifiers.
//!
//! # Example
//!
//! ```ignore
//! use sextant_models::ModelRegistry;
//! use sextant_models::llm::GenerationRequest;
//!
//! let mut registry = ModelRegistry::new();
//! registry.register_llm_provider("anthropic", Arc::new(provider));
//!
//! let llm = registry.llm("anthropic/claude-sonnet-4-5-20250929")?;
//! let response = llm.generate(GenerationRequest::new("Hello!")).await?;
//! ```

pub mod error;
pub mod llm;
mod registry;

pub use registry::ModelRegistry;

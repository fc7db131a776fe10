//! Model provider backends for Sextant.
//!
//! Each provider implements [`LlmProvider`](sextant_models::llm::LlmProvider)
//! and is registered by name with a [`ModelRegistry`](sextant_models::ModelRegistry),
//! giving prompt functions standardized access to different model providers.
//!
//! # Supported Providers
//!
//! | Provider | Feature Flag | Description |
//! |----------|--------------|-------------|
//! | Anthropic | `anthropic` (default) | Direct Anthropic API access |
//!
//! # Usage
//!
//! ```no_run
//! # #[cfg(feature = "anthropic")]
//! # {
//! use sextant_model_providers::AnthropicProvider;
//! use sextant_models::ModelRegistry;
//! use std::sync::Arc;
//!
//! let provider = AnthropicProvider::from_env("ANTHROPIC_API_KEY").unwrap();
//!
//! let mut registry = ModelRegistry::new();
//! registry.register_llm_provider("anthropic", Arc::new(provider));
//! # }
//! ```

mod schema;

#[cfg(feature = "anthropic")]
pub mod anthropic;

#[cfg(feature = "anthropic")]
pub use anthropic::AnthropicProvider;

pub use schema::normalize_schema_for_strict_mode;

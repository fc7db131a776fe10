//! Anthropic provider backend.
//!
//! Uses the Anthropic messages API.
//!
//! ```no_run
//! # use sextant_model_providers::anthropic::AnthropicProvider;
//! let provider = AnthropicProvider::from_env("ANTHROPIC_API_KEY").unwrap();
//! ```

mod client;
mod provider;
mod types;

pub use provider::AnthropicProvider;

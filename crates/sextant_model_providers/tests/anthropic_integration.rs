//! Integration tests for the Anthropic provider.
//!
//! These tests are ignored by default because they require:
//! - `ANTHROPIC_API_KEY` environment variable (or in `.env` file)
//! - Network access to the Anthropic API
//! - May incur API costs
//!
//! To run these tests:
//! ```sh
//! cargo test -p sextant_model_providers --test anthropic_integration -- --ignored
//! ```

mod common;

use common::{LlmTestExt, init_env};
use sextant_model_providers::AnthropicProvider;
use sextant_models::ModelRegistry;
use sextant_models::llm::Llm;
use std::sync::Arc;

const MODEL: &str = "anthropic/claude-sonnet-4-5-20250929";

fn get_llm(model_id: &str) -> Llm {
    init_env();

    let provider =
        AnthropicProvider::from_env("ANTHROPIC_API_KEY").expect("ANTHROPIC_API_KEY should be set");

    let mut registry = ModelRegistry::new();
    registry.register_llm_provider("anthropic", Arc::new(provider));
    registry.llm(model_id).expect("model should be valid")
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn test_basic_generation() {
    get_llm(MODEL).test_basic_generation().await;
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn test_tool_calling() {
    get_llm(MODEL).test_tool_calling().await;
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn test_structured_output() {
    get_llm(MODEL).test_structured_output().await;
}

#[tokio::test]
#[ignore = "requires ANTHROPIC_API_KEY"]
async fn test_invalid_model_error() {
    get_llm("anthropic/not-a-real-model")
        .test_invalid_model_error()
        .await;
}

//! Shared test helpers for provider integration tests.

use std::future::Future;
use std::sync::Once;

use serde_json::json;
use sextant_models::llm::{GenerationRequest, Llm, ToolChoice, ToolDefinition};

static INIT: Once = Once::new();

/// Initialize environment variables from `.env` file (once).
pub fn init_env() {
    INIT.call_once(|| {
        let _ = dotenvy::dotenv();
    });
}

fn weather_tool() -> ToolDefinition {
    ToolDefinition {
        name: "get_weather".to_string(),
        description: "Get the current weather in a location".to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "location": {
                    "type": "string",
                    "description": "The city and state, e.g. San Francisco, CA"
                }
            },
            "required": ["location"]
        }),
    }
}

/// Extension trait for testing LLM providers.
pub trait LlmTestExt {
    /// Tests basic generation - expects the model to say "hello".
    fn test_basic_generation(&self) -> impl Future<Output = ()> + Send;

    /// Tests tool calling - expects the model to call the weather tool.
    fn test_tool_calling(&self) -> impl Future<Output = ()> + Send;

    /// Tests schema-constrained output - expects a wrapped capital city.
    fn test_structured_output(&self) -> impl Future<Output = ()> + Send;

    /// Tests that an invalid model returns an error.
    fn test_invalid_model_error(&self) -> impl Future<Output = ()> + Send;
}

impl LlmTestExt for Llm {
    async fn test_basic_generation(&self) {
        let request = GenerationRequest::new("Say 'hello' and nothing else.");

        let response = self
            .generate(request)
            .await
            .expect("generation should succeed");

        let text = response.text().to_lowercase();
        assert!(
            text.contains("hello"),
            "response should contain 'hello': {text}"
        );
    }

    async fn test_tool_calling(&self) {
        let request = GenerationRequest::new("What's the weather like in Tokyo?")
            .tool(weather_tool())
            .tool_choice(ToolChoice::Required);

        let response = self
            .generate(request)
            .await
            .expect("generation should succeed");

        let tool_calls = response.tool_calls();
        assert!(!tool_calls.is_empty(), "should have at least one tool call");
        assert_eq!(tool_calls[0].function.name, "get_weather");
        assert!(
            tool_calls[0].function.arguments.get("location").is_some(),
            "tool call should have location argument"
        );
    }

    async fn test_structured_output(&self) {
        let schema = json!({
            "type": "object",
            "properties": {"value": {"type": "string"}},
            "required": ["value"]
        });
        let request = GenerationRequest::new("What is the capital of Ireland? Name only.");

        let value = self
            .generate_with_schema(request, schema)
            .await
            .expect("structured generation should succeed");

        assert_eq!(value["value"], "Dublin");
    }

    async fn test_invalid_model_error(&self) {
        let request = GenerationRequest::new("Hello");
        let result = self.generate(request).await;

        assert!(result.is_err(), "should fail with invalid model");
    }
}

//! The standard backend over a [`Llm`] handle.
//!
//! [`LlmBackend`] maps a [`BackendRequest`] onto a model request:
//!
//! - `String` among the output types allows a plain-text answer.
//! - A single non-string output type, with no tools and no text answer
//!   allowed, is requested as structured output wrapped in `{"value": ...}`.
//! - Otherwise every non-string output type is offered as a pseudo-tool
//!   `return_<name>` taking one `value` argument, next to the real tools.
//!   A pseudo-tool whose name is already taken gets a numeric suffix.
//!   If no text answer is allowed the model is required to call a tool.
//!
//! [`DefaultBackend`] builds an [`LlmBackend`] from [`BackendConfig`] the
//! first time it is used, so declaring a prompt never needs credentials.

use crate::backend::{Backend, BackendRequest, Completion, ToolInvocation};
use crate::error::BackendError;
use crate::output::OutputType;
use async_trait::async_trait;
use serde_json::{Value, json};
use sextant_models::llm::{GenerationRequest, Llm, ToolCall, ToolDefinition};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};

/// Prefix of the pseudo-tools that carry typed answers.
pub const RETURN_TOOL_PREFIX: &str = "return_";

/// Environment variable holding the default model identifier.
pub const MODEL_ENV_VAR: &str = "SEXTANT_MODEL";

/// Environment variable naming the variable that holds the API key.
pub const API_KEY_VAR_ENV_VAR: &str = "SEXTANT_API_KEY_VAR";

/// Model used when [`MODEL_ENV_VAR`] is unset.
pub const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4-5-20250929";

/// API key variable used when [`API_KEY_VAR_ENV_VAR`] is unset.
pub const DEFAULT_API_KEY_VAR: &str = "ANTHROPIC_API_KEY";

/// A [`Backend`] that answers with a language model.
#[derive(Debug, Clone)]
pub struct LlmBackend {
    llm: Llm,
    system: Option<String>,
}

impl LlmBackend {
    /// Creates a backend for the given model handle.
    #[must_use]
    pub fn new(llm: Llm) -> Self {
        Self { llm, system: None }
    }

    /// Sets a system prompt sent with every request.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Returns the model handle.
    #[must_use]
    pub fn llm(&self) -> &Llm {
        &self.llm
    }

    fn base_request(&self, request: &BackendRequest) -> GenerationRequest {
        let generation = GenerationRequest::from_messages(request.messages.clone());
        match &self.system {
            Some(system) => generation.system(system.clone()),
            None => generation,
        }
    }

    async fn complete_structured(
        &self,
        request: &BackendRequest,
        output_type: &OutputType,
    ) -> Result<Completion, BackendError> {
        let schema = json!({
            "type": "object",
            "properties": { "value": output_type.schema() },
            "required": ["value"]
        });

        let response = self
            .llm
            .generate_with_schema(self.base_request(request), schema)
            .await?;

        Ok(Completion::Data {
            output_type: output_type.clone(),
            value: unwrap_value(response, output_type)?,
        })
    }

    async fn complete_with_tools(
        &self,
        request: &BackendRequest,
        allows_text: bool,
        typed: &[&OutputType],
    ) -> Result<Completion, BackendError> {
        let return_names = return_tool_names(request, typed);
        let mut definitions = request.tool_definitions();
        definitions.extend(
            typed
                .iter()
                .zip(&return_names)
                .map(|(output_type, name)| return_tool(name, output_type)),
        );

        let mut generation = self.base_request(request).tools(definitions);
        if !allows_text {
            generation = generation.require_tool();
        }

        let response = self.llm.generate(generation).await?;

        if let Some(call) = response.tool_calls().first() {
            return map_tool_call(call, request, typed, &return_names);
        }

        let text = response.text();
        if allows_text {
            return Ok(Completion::Data {
                output_type: OutputType::data::<String>(),
                value: Value::String(text),
            });
        }
        if let [output_type] = typed
            && let Ok(value) = serde_json::from_str::<Value>(&text)
        {
            return Ok(Completion::Data {
                output_type: (*output_type).clone(),
                value,
            });
        }

        Err(BackendError::InvalidOutput(
            "model answered with text but no text output is accepted".to_string(),
        ))
    }
}

#[async_trait]
impl Backend for LlmBackend {
    async fn complete(&self, request: BackendRequest) -> Result<Completion, BackendError> {
        let allows_text = request.output_types.iter().any(OutputType::is_string);
        let typed: Vec<&OutputType> = request
            .output_types
            .iter()
            .filter(|output_type| !output_type.is_string())
            .collect();

        tracing::debug!(
            model = %self.llm.model_name(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            output_types = request.output_types.len(),
            allows_text,
            "mapping prompt request onto model request"
        );

        match typed.as_slice() {
            [output_type] if !allows_text && request.tools.is_empty() => {
                self.complete_structured(&request, output_type).await
            }
            _ => self.complete_with_tools(&request, allows_text, &typed).await,
        }
    }
}

/// Names the pseudo-tool of each typed output.
///
/// Names are `return_<type name>`, suffixed with a counter when that name is
/// already taken by a registered tool or an earlier output type.
fn return_tool_names(request: &BackendRequest, typed: &[&OutputType]) -> Vec<String> {
    let mut taken: HashSet<String> = request.tools.iter().map(|tool| tool.name()).collect();
    typed
        .iter()
        .map(|output_type| {
            let base = format!("{RETURN_TOOL_PREFIX}{}", output_type.name());
            let mut name = base.clone();
            let mut counter = 2;
            while taken.contains(&name) {
                name = format!("{base}_{counter}");
                counter += 1;
            }
            taken.insert(name.clone());
            name
        })
        .collect()
}

/// Builds the pseudo-tool through which the model returns a typed value.
fn return_tool(name: &str, output_type: &OutputType) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: format!("Return a value of type {}.", output_type.name()),
        parameters: json!({
            "type": "object",
            "properties": { "value": output_type.schema() },
            "required": ["value"]
        }),
    }
}

fn map_tool_call(
    call: &ToolCall,
    request: &BackendRequest,
    typed: &[&OutputType],
    return_names: &[String],
) -> Result<Completion, BackendError> {
    let name = call.function.name.as_str();

    if let Some((output_type, _)) = typed
        .iter()
        .zip(return_names)
        .find(|(_, return_name)| *return_name == name)
    {
        return Ok(Completion::Data {
            output_type: (*output_type).clone(),
            value: unwrap_value(call.function.arguments.clone(), output_type)?,
        });
    }

    match request.tool(name) {
        Some(tool) => Ok(Completion::ToolCall(ToolInvocation {
            id: call.id.clone(),
            tool: Arc::clone(tool),
            arguments: call.function.arguments.clone(),
        })),
        None => Err(BackendError::UnknownTool(name.to_string())),
    }
}

fn unwrap_value(response: Value, output_type: &OutputType) -> Result<Value, BackendError> {
    match response {
        Value::Object(mut fields) => fields.remove("value").ok_or_else(|| {
            BackendError::InvalidOutput(format!(
                "answer for '{}' has no 'value' field",
                output_type.name()
            ))
        }),
        other => Err(BackendError::InvalidOutput(format!(
            "answer for '{}' is not an object: {other}",
            output_type.name()
        ))),
    }
}

/// Settings for the standard backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Model identifier in `provider/model` form.
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_var: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key_var: DEFAULT_API_KEY_VAR.to_string(),
        }
    }
}

impl BackendConfig {
    /// Reads the configuration from `SEXTANT_MODEL` and `SEXTANT_API_KEY_VAR`,
    /// falling back to the defaults for unset or empty variables.
    #[must_use]
    pub fn from_env() -> Self {
        let read = |var: &str, default: &str| {
            std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            model: read(MODEL_ENV_VAR, DEFAULT_MODEL),
            api_key_var: read(API_KEY_VAR_ENV_VAR, DEFAULT_API_KEY_VAR),
        }
    }

    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the name of the API key variable.
    #[must_use]
    pub fn with_api_key_var(mut self, api_key_var: impl Into<String>) -> Self {
        self.api_key_var = api_key_var.into();
        self
    }

    /// Builds an [`LlmBackend`] for this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the API key is missing, the model
    /// identifier is invalid, or no provider is compiled in for it.
    #[cfg(feature = "anthropic")]
    pub fn build(&self) -> Result<LlmBackend, BackendError> {
        use sextant_model_providers::AnthropicProvider;
        use sextant_models::ModelRegistry;

        let provider = AnthropicProvider::from_env(&self.api_key_var)
            .map_err(|err| BackendError::Config(err.to_string()))?;

        let mut registry = ModelRegistry::new();
        registry
            .try_register_llm_provider("anthropic", Arc::new(provider))
            .map_err(|err| BackendError::Config(err.to_string()))?;

        let llm = registry
            .llm(&self.model)
            .map_err(|err| BackendError::Config(err.to_string()))?;
        Ok(LlmBackend::new(llm))
    }

    /// Builds an [`LlmBackend`] for this configuration.
    ///
    /// # Errors
    ///
    /// Always returns [`BackendError::Config`]: no provider is compiled in.
    #[cfg(not(feature = "anthropic"))]
    pub fn build(&self) -> Result<LlmBackend, BackendError> {
        Err(BackendError::Config(format!(
            "no model provider available for '{}'; enable the `anthropic` feature",
            self.model
        )))
    }
}

/// The backend used when a declaration names none.
///
/// Resolves its [`BackendConfig`] on the first call and reuses the resulting
/// [`LlmBackend`] afterwards. Configuration errors are returned from that
/// call as [`BackendError::Config`], and resolution is retried on the next.
#[derive(Debug, Default)]
pub struct DefaultBackend {
    config: Option<BackendConfig>,
    backend: OnceLock<LlmBackend>,
}

impl DefaultBackend {
    /// Creates a backend configured from the environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend with explicit configuration.
    #[must_use]
    pub fn with_config(config: BackendConfig) -> Self {
        Self {
            config: Some(config),
            backend: OnceLock::new(),
        }
    }

    fn resolve(&self) -> Result<&LlmBackend, BackendError> {
        if let Some(backend) = self.backend.get() {
            return Ok(backend);
        }

        let config = self.config.clone().unwrap_or_else(BackendConfig::from_env);
        tracing::debug!(model = %config.model, "resolving default prompt backend");
        let backend = config.build()?;
        Ok(self.backend.get_or_init(|| backend))
    }
}

#[async_trait]
impl Backend for DefaultBackend {
    async fn complete(&self, request: BackendRequest) -> Result<Completion, BackendError> {
        self.resolve()?.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use sextant_models::ModelRegistry;
    use sextant_models::llm::{
        AssistantBlock, GenerationError, GenerationResponse, LlmProvider, Message, ToolChoice,
        Usage,
    };
    use sextant_tools::{ToolError, tool};
    use std::sync::Mutex;

    /// Replies with a fixed response and records the requests it saw.
    struct ScriptedProvider {
        reply: Vec<AssistantBlock>,
        requests: Mutex<Vec<GenerationRequest>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        async fn generate(
            &self,
            _model: &str,
            request: GenerationRequest,
        ) -> Result<GenerationResponse, GenerationError> {
            self.requests.lock().unwrap().push(request);
            Ok(GenerationResponse {
                content: self.reply.clone(),
                usage: Usage::default(),
            })
        }
    }

    fn backend(reply: Vec<AssistantBlock>) -> (LlmBackend, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider {
            reply,
            requests: Mutex::new(Vec::new()),
        });
        let mut registry = ModelRegistry::new();
        registry.register_llm_provider("scripted", Arc::clone(&provider));
        let llm = registry.llm("scripted/test-model").unwrap();
        (LlmBackend::new(llm), provider)
    }

    fn request(output_types: Vec<OutputType>) -> BackendRequest {
        BackendRequest {
            messages: vec![Message::user("What is the capital of Ireland?")],
            tools: Vec::new(),
            output_types,
        }
    }

    #[derive(Debug, Deserialize, schemars::JsonSchema, PartialEq)]
    struct Capital {
        city: String,
    }

    #[tool]
    /// Look up a country's capital.
    async fn lookup(country: String) -> Result<String, ToolError> {
        Ok(format!("capital of {country}"))
    }

    #[tokio::test]
    async fn string_output_is_plain_text() {
        let (backend, provider) = backend(vec![AssistantBlock::Text("Dublin".to_string())]);

        let completion = backend
            .complete(request(vec![OutputType::data::<String>()]))
            .await
            .unwrap();

        let Completion::Data { output_type, value } = completion else {
            panic!("expected data");
        };
        assert!(output_type.is_string());
        assert_eq!(value, "Dublin");

        let sent = provider.requests.lock().unwrap();
        assert!(sent[0].tools.is_none());
        assert!(sent[0].tool_choice.is_none());
        assert!(sent[0].output_schema.is_none());
    }

    #[tokio::test]
    async fn single_type_uses_structured_output() {
        let (backend, provider) = backend(vec![AssistantBlock::Text(
            r#"{"value": {"city": "Dublin"}}"#.to_string(),
        )]);

        let completion = backend
            .complete(request(vec![OutputType::data::<Capital>()]))
            .await
            .unwrap();

        let Completion::Data { output_type, value } = completion else {
            panic!("expected data");
        };
        assert!(output_type.is::<Capital>());
        assert_eq!(value, json!({"city": "Dublin"}));

        let sent = provider.requests.lock().unwrap();
        let schema = sent[0].output_schema.as_ref().unwrap();
        assert_eq!(schema["required"], json!(["value"]));
        assert_eq!(schema["properties"]["value"]["type"], "object");
    }

    #[tokio::test]
    async fn typed_answers_arrive_through_return_tools() {
        let (backend, provider) = backend(vec![AssistantBlock::ToolCall(ToolCall::new(
            "call_1",
            "return_capital",
            json!({"value": {"city": "Dublin"}}),
        ))]);

        let mut req = request(vec![OutputType::data::<String>(), OutputType::data::<Capital>()]);
        req.tools.push(Arc::new(lookup()));
        let completion = backend.complete(req).await.unwrap();

        let Completion::Data { output_type, value } = completion else {
            panic!("expected data");
        };
        assert!(output_type.is::<Capital>());
        assert_eq!(value["city"], "Dublin");

        let sent = provider.requests.lock().unwrap();
        let names: Vec<&str> = sent[0]
            .tools
            .as_ref()
            .unwrap()
            .iter()
            .map(|tool| tool.name.as_str())
            .collect();
        assert_eq!(names, vec!["lookup", "return_capital"]);
        // Text is an acceptable answer, so tool use stays optional.
        assert!(sent[0].tool_choice.is_none());
    }

    #[tokio::test]
    async fn registered_tool_calls_become_invocations() {
        let (backend, provider) = backend(vec![AssistantBlock::ToolCall(ToolCall::new(
            "call_7",
            "lookup",
            json!({"country": "Ireland"}),
        ))]);

        let mut req = request(vec![OutputType::data::<Capital>()]);
        req.tools.push(Arc::new(lookup()));
        let completion = backend.complete(req).await.unwrap();

        let Completion::ToolCall(invocation) = completion else {
            panic!("expected tool call");
        };
        assert_eq!(invocation.id, "call_7");
        assert_eq!(invocation.name(), "lookup");
        assert_eq!(invocation.execute().await.unwrap(), json!("capital of Ireland"));

        let sent = provider.requests.lock().unwrap();
        assert_eq!(sent[0].tool_choice, Some(ToolChoice::Required));
    }

    mod atlas {
        #[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
        pub struct Capital {
            pub population: u32,
        }
    }

    #[tool]
    /// A tool whose name looks like a return tool.
    async fn return_capital(country: String) -> Result<String, ToolError> {
        Ok(format!("looked up {country}"))
    }

    fn sent_tool_names(provider: &ScriptedProvider) -> Vec<String> {
        provider.requests.lock().unwrap()[0]
            .tools
            .as_ref()
            .unwrap()
            .iter()
            .map(|tool| tool.name.clone())
            .collect()
    }

    #[tokio::test]
    async fn same_named_output_types_get_distinct_return_tools() {
        let (backend, provider) = backend(vec![AssistantBlock::ToolCall(ToolCall::new(
            "call_1",
            "return_capital_2",
            json!({"value": {"population": 7}}),
        ))]);

        let req = request(vec![
            OutputType::data::<Capital>(),
            OutputType::data::<atlas::Capital>(),
        ]);
        let completion = backend.complete(req).await.unwrap();

        let Completion::Data { output_type, value } = completion else {
            panic!("expected data");
        };
        assert!(output_type.is::<atlas::Capital>());
        assert_eq!(value, json!({"population": 7}));
        assert_eq!(
            sent_tool_names(&provider),
            vec!["return_capital", "return_capital_2"]
        );
    }

    #[tokio::test]
    async fn registered_tool_keeps_its_name_over_return_tools() {
        let (backend, provider) = backend(vec![AssistantBlock::ToolCall(ToolCall::new(
            "call_1",
            "return_capital",
            json!({"country": "Ireland"}),
        ))]);

        let mut req = request(vec![OutputType::data::<Capital>()]);
        req.tools.push(Arc::new(return_capital()));
        let completion = backend.complete(req).await.unwrap();

        let Completion::ToolCall(invocation) = completion else {
            panic!("expected tool call");
        };
        assert_eq!(invocation.name(), "return_capital");
        assert_eq!(
            sent_tool_names(&provider),
            vec!["return_capital", "return_capital_2"]
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let (backend, _) = backend(vec![AssistantBlock::ToolCall(ToolCall::new(
            "call_1",
            "delete_everything",
            json!({}),
        ))]);

        let mut req = request(vec![OutputType::data::<Capital>()]);
        req.tools.push(Arc::new(lookup()));
        let err = backend.complete(req).await.unwrap_err();
        assert!(matches!(err, BackendError::UnknownTool(name) if name == "delete_everything"));
    }

    #[tokio::test]
    async fn text_is_rejected_when_only_typed_answers_are_accepted() {
        let (backend, _) = backend(vec![AssistantBlock::Text("Dublin".to_string())]);

        let req = request(vec![
            OutputType::data::<Capital>(),
            OutputType::data::<Vec<String>>(),
        ]);
        let err = backend.complete(req).await.unwrap_err();
        assert!(matches!(err, BackendError::InvalidOutput(_)));
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = BackendConfig::default()
            .with_model("anthropic/claude-haiku-4-5")
            .with_api_key_var("MY_KEY");
        assert_eq!(config.model, "anthropic/claude-haiku-4-5");
        assert_eq!(config.api_key_var, "MY_KEY");
        assert_eq!(BackendConfig::default().model, DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn default_backend_reports_configuration_errors() {
        let backend = DefaultBackend::with_config(
            BackendConfig::default().with_api_key_var("SEXTANT_TEST_UNSET_API_KEY"),
        );
        let err = backend
            .complete(request(vec![OutputType::data::<String>()]))
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Config(_)));
    }
}

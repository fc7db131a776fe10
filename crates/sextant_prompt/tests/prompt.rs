//! Integration tests for prompt functions built with `PromptBuilder`.

mod common;

use common::{ScriptedBackend, tool_call};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use sextant_prompt::{
    Arguments, BackendError, BindingError, DeclarationError, Either, FunctionCall, OutputError,
    OutputType, Parameter, PlaceholderError, PromptBuilder, PromptError, PromptFunction,
};
use sextant_tools::{ToolError, tool};
use std::sync::Arc;

#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
struct Answer {
    text: String,
}

#[tool]
/// Search the documentation.
async fn search(
    /// What to look for.
    query: String,
) -> Result<Vec<String>, ToolError> {
    Ok(vec![format!("{query} guide"), format!("{query} reference")])
}

#[tool]
/// Always fails.
async fn broken() -> Result<String, ToolError> {
    Err(ToolError::execution_error("disk on fire"))
}

fn add(backend: Arc<ScriptedBackend>) -> PromptFunction<i64> {
    PromptBuilder::new("add")
        .template("Add {a} and {b}")
        .param(Parameter::new("a"))
        .param(Parameter::new("b").with_default(0))
        .model(backend)
        .build()
        .unwrap()
}

#[test]
fn add_renders_with_defaults_and_overrides() {
    let add = add(ScriptedBackend::answering::<i64>(json!(0)));

    assert_eq!(add.render(Arguments::new().kwarg("a", 5)).unwrap(), "Add 5 and 0");
    assert_eq!(
        add.render(Arguments::new().kwarg("a", 5).kwarg("b", 3))
            .unwrap(),
        "Add 5 and 3"
    );
    assert_eq!(add.render(Arguments::new().arg(5).arg(3)).unwrap(), "Add 5 and 3");
    assert!(matches!(
        add.render(Arguments::new()),
        Err(PromptError::Binding(BindingError::MissingArgument { ref name })) if name == "a"
    ));
}

#[tokio::test]
async fn call_sends_rendered_prompt_and_returns_typed_value() {
    let backend = ScriptedBackend::answering::<i64>(json!(8));
    let add = add(Arc::clone(&backend));

    let sum = add
        .call(Arguments::new().kwarg("a", 5).kwarg("b", 3))
        .await
        .unwrap();
    assert_eq!(sum, 8);

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].prompt().as_deref(), Some("Add 5 and 3"));
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(requests[0].output_types, vec![OutputType::data::<i64>()]);
    assert!(requests[0].tools.is_empty());
}

#[tokio::test]
async fn binding_errors_never_reach_the_backend() {
    let backend = ScriptedBackend::answering::<i64>(json!(0));
    let add = add(Arc::clone(&backend));

    let missing = add.call(Arguments::new()).await;
    assert!(matches!(
        missing,
        Err(PromptError::Binding(BindingError::MissingArgument { .. }))
    ));

    let unknown = add
        .call(Arguments::new().kwarg("a", 1).kwarg("c", 2))
        .await;
    assert!(matches!(
        unknown,
        Err(PromptError::Binding(BindingError::UnknownKeyword { ref name })) if name == "c"
    ));

    let too_many = add.call(Arguments::new().arg(1).arg(2).arg(3)).await;
    assert!(matches!(
        too_many,
        Err(PromptError::Binding(BindingError::TooManyPositional { expected: 2, got: 3 }))
    ));

    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn placeholder_errors_never_reach_the_backend() {
    let backend = ScriptedBackend::echo();
    let function = PromptBuilder::<String>::new("mismatched")
        .template("Describe {topic} for {audience}")
        .param(Parameter::new("topic"))
        .model(Arc::clone(&backend))
        .build()
        .unwrap();

    let result = function.call(Arguments::new().kwarg("topic", "tides")).await;
    assert!(matches!(
        result,
        Err(PromptError::Placeholder(PlaceholderError::Unbound { ref name })) if name == "audience"
    ));
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn union_with_function_call_offers_tools_and_data_types() {
    let backend = ScriptedBackend::answering::<Answer>(json!({"text": "see the book"}));
    let function = PromptBuilder::<Either<Answer, FunctionCall<Vec<String>>>>::new("ask")
        .template("Answer or search: {question}")
        .param(Parameter::new("question"))
        .function(search())
        .model(Arc::clone(&backend))
        .build()
        .unwrap();

    assert_eq!(function.return_types(), vec![OutputType::data::<Answer>()]);

    let answer = function
        .call(Arguments::new().kwarg("question", "what is a lifetime?"))
        .await
        .unwrap();
    let Either::Left(answer) = answer else {
        panic!("expected an answer, got {answer:?}");
    };
    assert_eq!(answer.text, "see the book");

    let request = &backend.requests()[0];
    assert_eq!(request.output_types, vec![OutputType::data::<Answer>()]);
    let names: Vec<String> = request.tools.iter().map(|tool| tool.name()).collect();
    assert_eq!(names, vec!["search"]);
}

#[tokio::test]
async fn function_call_is_returned_and_executed_by_caller() {
    let backend = ScriptedBackend::new(|request| {
        Ok(tool_call(request, "search", json!({"query": "traits"})))
    });
    let function = PromptBuilder::<Either<Answer, FunctionCall<Vec<String>>>>::new("ask")
        .template("Answer or search: {question}")
        .param(Parameter::new("question"))
        .function(search())
        .model(backend)
        .build()
        .unwrap();

    let result = function
        .call(Arguments::new().kwarg("question", "how do traits work?"))
        .await
        .unwrap();
    let Either::Right(call) = result else {
        panic!("expected a function call, got {result:?}");
    };

    assert_eq!(call.name(), "search");
    assert_eq!(call.arguments(), &json!({"query": "traits"}));
    assert_eq!(
        call.call().await.unwrap(),
        vec!["traits guide".to_string(), "traits reference".to_string()]
    );
}

#[tokio::test]
async fn failing_function_call_reports_tool_error() {
    let backend = ScriptedBackend::new(|request| Ok(tool_call(request, "broken", json!({}))));
    let function = PromptBuilder::<FunctionCall<String>>::new("pick")
        .template("Pick a tool")
        .function(broken())
        .model(backend)
        .build()
        .unwrap();

    let call = function.call(Arguments::new()).await.unwrap();
    let err = call.call().await.unwrap_err();
    assert!(matches!(err, ToolError::ExecutionError(ref msg) if msg == "disk on fire"));
}

#[tokio::test]
async fn mismatched_completions_are_output_errors() {
    let wrong_type = PromptBuilder::<String>::new("name")
        .template("Name a river")
        .model(ScriptedBackend::answering::<i64>(json!(3)))
        .build()
        .unwrap();
    assert!(matches!(
        wrong_type.call(Arguments::new()).await,
        Err(PromptError::Output(OutputError::UnexpectedType { .. }))
    ));

    let unwanted_call = PromptBuilder::<String>::new("name")
        .template("Name a river")
        .function(search())
        .model(ScriptedBackend::new(|request| {
            Ok(tool_call(request, "search", json!({"query": "rivers"})))
        }))
        .build()
        .unwrap();
    assert!(matches!(
        unwanted_call.call(Arguments::new()).await,
        Err(PromptError::Output(OutputError::UnexpectedToolCall { ref tool })) if tool == "search"
    ));

    let bad_value = PromptBuilder::<Answer>::new("answer")
        .template("Answer")
        .model(ScriptedBackend::answering::<Answer>(json!({"txt": 1})))
        .build()
        .unwrap();
    assert!(matches!(
        bad_value.call(Arguments::new()).await,
        Err(PromptError::Output(OutputError::Deserialize { .. }))
    ));
}

#[tokio::test]
async fn backend_errors_pass_through_unchanged() {
    let function = PromptBuilder::<String>::new("fail")
        .template("Fail")
        .model(ScriptedBackend::new(|_| {
            Err(BackendError::InvalidOutput("no answer".to_string()))
        }))
        .build()
        .unwrap();

    let err = function.call(Arguments::new()).await.unwrap_err();
    assert!(matches!(
        err,
        PromptError::Backend(BackendError::InvalidOutput(ref msg)) if msg == "no answer"
    ));
    assert_eq!(err.to_string(), "model returned invalid output: no answer");
}

#[test]
fn accessors_return_copies() {
    let function = PromptBuilder::<Either<Answer, FunctionCall<Vec<String>>>>::new("ask")
        .template("{question}")
        .param(Parameter::new("question"))
        .function(search())
        .model(ScriptedBackend::echo())
        .build()
        .unwrap();

    let mut tools = function.tools();
    tools.clear();
    assert_eq!(function.tools().len(), 1);

    let mut types = function.return_types();
    types.push(OutputType::data::<String>());
    assert_eq!(function.return_types(), vec![OutputType::data::<Answer>()]);

    let definitions = function.tool_definitions();
    assert_eq!(definitions[0].name, "search");
    assert_eq!(definitions[0].description, "Search the documentation.");
}

#[test]
fn declaration_identity_is_copied() {
    let function = PromptBuilder::<String>::new("summarize")
        .doc("\n    Summarize {text} in one line.\n")
        .param(Parameter::new("text").with_description("The text to summarize."))
        .model(ScriptedBackend::echo())
        .build()
        .unwrap();

    assert_eq!(function.name(), "summarize");
    assert_eq!(function.doc(), Some("Summarize {text} in one line."));
    assert_eq!(function.metadata().name, "summarize");
    assert_eq!(
        function.signature().parameter("text").unwrap().description(),
        Some("The text to summarize.")
    );
}

#[test]
fn declaration_without_template_or_doc_fails() {
    let err = PromptBuilder::<String>::new("empty")
        .param(Parameter::new("x"))
        .build()
        .unwrap_err();
    assert!(matches!(err, DeclarationError::MissingTemplate { ref function } if function == "empty"));
    assert!(err.to_string().contains("empty"));
}

#[test]
fn duplicate_tools_are_rejected() {
    let err = PromptBuilder::<String>::new("twice")
        .template("Search twice")
        .function(search())
        .function(search())
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DeclarationError::DuplicateTool { ref tool, .. } if tool == "search"
    ));
}

#[test]
fn repeated_binding_is_identical() {
    let add = add(ScriptedBackend::answering::<i64>(json!(0)));
    let bound = add.signature().bind(Arguments::new().kwarg("a", 1)).unwrap();
    let again = add.signature().bind(Arguments::new().kwarg("a", 1)).unwrap();

    assert_eq!(bound, again);
    assert_eq!(bound.names(), vec!["a", "b"]);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let backend = ScriptedBackend::echo();
    let greet = Arc::new(
        PromptBuilder::<String>::new("greet")
            .template("Hello {name}")
            .param(Parameter::new("name"))
            .model(Arc::clone(&backend))
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = ["Ada", "Grace", "Barbara", "Frances"]
        .into_iter()
        .map(|name| {
            let greet = Arc::clone(&greet);
            tokio::spawn(async move { greet.call(Arguments::new().arg(name)).await })
        })
        .collect();

    let mut greetings = Vec::new();
    for handle in handles {
        greetings.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(
        greetings,
        vec!["Hello Ada", "Hello Grace", "Hello Barbara", "Hello Frances"]
    );
    assert_eq!(backend.call_count(), 4);
}

#[test]
fn default_backend_is_not_resolved_at_declaration() {
    let function = PromptBuilder::<String>::new("lazy")
        .template("Say {word}")
        .param(Parameter::new("word"))
        .build()
        .unwrap();

    assert_eq!(
        function.render(Arguments::new().arg("hi")).unwrap(),
        "Say hi"
    );
}

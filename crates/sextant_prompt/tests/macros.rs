//! Integration tests for `#[prompt]` and `#[prompt_chain]`.

mod common;

use common::{ScriptedBackend, data, last_tool_result, tool_call};
use serde_json::json;
use sextant_prompt::{Either, FunctionCall, OutputType, PromptError, prompt, prompt_chain};
use sextant_tools::{ToolError, tool};

#[tool]
/// Look up the capital of a country.
async fn capital_of(country: String) -> Result<String, ToolError> {
    match country.as_str() {
        "France" => Ok("Paris".to_string()),
        "Japan" => Ok("Tokyo".to_string()),
        other => Err(ToolError::execution_error(format!("unknown country {other}"))),
    }
}

/// Add {a} and {b}.
#[prompt(model = ScriptedBackend::echo())]
fn add(
    /// The first addend.
    a: i64,
    /// The second addend.
    #[default(0)]
    b: i64,
) -> String {
}

#[prompt(template = "Say {word} loudly", model = ScriptedBackend::echo())]
fn shout(word: &str) -> String {}

/// Write a short poem.
///
///   Topic: {topic}
///     Mood: {mood}
#[prompt(model = ScriptedBackend::echo())]
fn poem(topic: String, #[default("calm")] mood: String) -> String {}

#[prompt(
    "Where is the government of {country} seated?",
    functions = [capital_of()],
    model = ScriptedBackend::new(|request| {
        Ok(tool_call(request, "capital_of", json!({ "country": "France" })))
    }),
)]
fn seat_of_government(country: String) -> Either<String, FunctionCall<String>> {}

#[prompt("How many legs does a {animal} have?", model = ScriptedBackend::answering::<u32>(json!(4)))]
fn legs(animal: String) -> u32 {}

#[prompt_chain(
    "What is the capital of {country}?",
    functions = [capital_of()],
    model = ScriptedBackend::new(|request| match last_tool_result(request) {
        Some((capital, false)) => Ok(data::<String>(json!(format!("The capital is {capital}.")))),
        Some((err, true)) => Ok(data::<String>(json!(format!("I could not find it: {err}")))),
        None => Ok(tool_call(request, "capital_of", json!({ "country": "Japan" }))),
    }),
    max_iterations = 4,
)]
fn capital(country: String) -> String {}

#[tokio::test]
async fn doc_comment_is_the_template() {
    let add = add();

    assert_eq!(add.render(5, None).unwrap(), "Add 5 and 0.");
    assert_eq!(add.call(5, Some(3)).await.unwrap(), "Add 5 and 3.");
    assert_eq!(add.doc(), Some("Add {a} and {b}."));
}

#[test]
fn declaration_metadata_is_available_through_deref() {
    let add = add();

    assert_eq!(add.name(), "add");
    let parameters = add.signature().parameters();
    assert_eq!(parameters.len(), 2);
    assert_eq!(parameters[0].name(), "a");
    assert_eq!(parameters[0].description(), Some("The first addend."));
    assert!(!parameters[0].is_optional());
    assert_eq!(parameters[1].default(), Some(&json!(0)));
    assert_eq!(add.return_types(), vec![OutputType::data::<String>()]);
    assert!(format!("{add:?}").contains("add"));
}

#[test]
fn explicit_template_with_borrowed_parameter() {
    assert_eq!(shout().render("hello").unwrap(), "Say hello loudly");
    assert!(shout().doc().is_none());
}

#[test]
fn multi_line_doc_keeps_relative_indentation() {
    let poem = poem();

    assert_eq!(
        poem.render("autumn".to_string(), None).unwrap(),
        "Write a short poem.\n\nTopic: autumn\n  Mood: calm"
    );
    assert_eq!(
        poem.render("autumn".to_string(), Some("wry".to_string()))
            .unwrap(),
        "Write a short poem.\n\nTopic: autumn\n  Mood: wry"
    );
}

#[tokio::test]
async fn prompt_with_functions_returns_function_call() {
    let seat = seat_of_government();
    assert_eq!(seat.tools().len(), 1);

    let result = seat.call("France".to_string()).await.unwrap();
    let Either::Right(call) = result else {
        panic!("expected a function call, got {result:?}");
    };
    assert_eq!(call.name(), "capital_of");
    assert_eq!(call.call().await.unwrap(), "Paris");
}

#[tokio::test]
async fn typed_return_value() {
    assert_eq!(legs().call("spider".to_string()).await.unwrap(), 4);
}

#[tokio::test]
async fn prompt_chain_runs_tools() {
    let capital = capital();

    assert_eq!(capital.max_iterations(), 4);
    assert_eq!(
        capital.call("Japan".to_string()).await.unwrap(),
        "The capital is Tokyo."
    );
}

#[test]
fn try_new_builds_the_same_declaration() {
    let add = AddPrompt::try_new().unwrap();
    assert_eq!(add.template().source(), "Add {a} and {b}.");

    let capital = CapitalChain::try_new().unwrap();
    assert_eq!(capital.template().source(), "What is the capital of {country}?");
}

#[tokio::test]
async fn typed_call_rejects_unrenderable_arguments() {
    /// Compare {left} with {right}.
    #[prompt(model = ScriptedBackend::echo())]
    fn compare(left: String, right: std::collections::HashMap<(i32, i32), i32>) -> String {}

    let mut map = std::collections::HashMap::new();
    map.insert((1, 2), 3);
    let err = compare().call("x".to_string(), map).await.unwrap_err();
    assert!(matches!(err, PromptError::Binding(_)));
}

#[test]
fn blank_template_argument_uses_the_doc() {
    /// Translate {text} into French.
    #[prompt("", model = ScriptedBackend::echo())]
    fn translate(text: String) -> String {}

    assert_eq!(
        translate().render("good morning".to_string()).unwrap(),
        "Translate good morning into French."
    );
}

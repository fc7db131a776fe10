//! Procedural macros for Sextant prompt functions.
//!
//! Provides `#[prompt]` and `#[prompt_chain]`, which turn a bodiless function
//! declaration into a prompt function.

mod args;
mod prompt_fn;

use proc_macro::TokenStream;
use prompt_fn::Flavor;

/// Declares a prompt function.
///
/// The function's body must be empty: the template is the body. The template
/// comes from the attribute or, if none is given, from the function's doc
/// comments.
///
/// Generates a `<Name>Prompt` struct with typed `call` and `render` methods
/// taking the declared parameters, which dereferences to the underlying
/// `PromptFunction`, and a constructor function with the original name.
///
/// # Options
///
/// - `"..."` or `template = "..."`: the template
/// - `functions = [a(), b()]`: tools the model may ask to invoke
/// - `model = expr`: the backend; defaults to `DefaultBackend`
///
/// # Parameter Attributes
///
/// - `/// doc comment`: the parameter's description
/// - `#[default(value)]`: makes the parameter optional; `call` takes an `Option`
///
/// # Example
///
/// ```
/// use sextant_prompt::prompt;
///
/// /// Add {a} and {b}.
/// #[prompt]
/// fn add(a: i64, #[default(0)] b: i64) -> i64 {}
///
/// let add = add();
/// assert_eq!(add.render(5, None).unwrap(), "Add 5 and 0.");
/// assert_eq!(add.render(5, Some(3)).unwrap(), "Add 5 and 3.");
/// ```
#[proc_macro_attribute]
pub fn prompt(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = syn::parse_macro_input!(attr as args::PromptArgs);
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    prompt_fn::generate_prompt_fn(args, &input, Flavor::Prompt).into()
}

/// Declares a prompt chain.
///
/// Accepts the same options as [`macro@prompt`], plus `max_iterations = n`.
/// Generates a `<Name>Chain` struct that dereferences to `PromptChain`: tool
/// calls requested by the model are executed and their results sent back
/// until the model answers.
///
/// # Example
///
/// ```
/// use sextant_prompt::prompt_chain;
/// use sextant_tools::{ToolError, tool};
///
/// #[tool]
/// /// Get the current temperature in a city.
/// async fn temperature(city: String) -> Result<f64, ToolError> {
///     Ok(if city == "Oslo" { 4.5 } else { 20.0 })
/// }
///
/// #[prompt_chain("Is it warm in {city}?", functions = [temperature()], max_iterations = 3)]
/// fn is_warm(city: String) -> bool {}
///
/// let chain = is_warm();
/// assert_eq!(chain.max_iterations(), 3);
/// assert_eq!(chain.tools().len(), 1);
/// ```
#[proc_macro_attribute]
pub fn prompt_chain(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = syn::parse_macro_input!(attr as args::PromptArgs);
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    prompt_fn::generate_prompt_fn(args, &input, Flavor::Chain).into()
}

//! Procedural macros for the Sextant tool framework.
//!
//! Provides `#[tool]`, which turns an async function into a `Tool`.

mod param;
mod tool_fn;

use proc_macro::TokenStream;

/// Defines a tool from an async function.
///
/// Generates a `Tool` impl struct with automatic JSON schema generation
/// and parameter extraction, plus a constructor function with the original
/// function's name.
///
/// # Parameter Attributes
///
/// - `/// doc comment`: becomes the parameter's description in JSON schema
/// - `#[default(value)]`: makes the parameter optional with a default value
///
/// # Example
///
/// ```
/// use sextant_tools::{tool, Tool, ToolError};
///
/// #[tool]
/// /// Search for documents.
/// async fn search(
///     /// The search query.
///     query: String,
///     /// Max results.
///     #[default(10)]
///     limit: usize,
/// ) -> Result<String, ToolError> {
///     Ok(format!("Results for: {query}"))
/// }
///
/// assert_eq!(search().definition().name, "search");
/// ```
#[proc_macro_attribute]
pub fn tool(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(item as syn::ItemFn);
    tool_fn::generate_tool_fn(&input).into()
}

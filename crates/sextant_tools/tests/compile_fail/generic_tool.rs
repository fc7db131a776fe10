use sextant_tools::tool;

#[tool]
/// Render any value as text.
async fn render<T: ToString>(value: T) -> Result<String, sextant_tools::ToolError> {
    Ok(value.to_string())
}

fn main() {}

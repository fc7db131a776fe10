use sextant_prompt::prompt;

/// Summarize {text}.
#[prompt]
fn summarize(text: String) {}

fn main() {}

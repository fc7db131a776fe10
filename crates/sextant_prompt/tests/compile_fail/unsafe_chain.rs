use sextant_prompt::prompt_chain;

/// Shout {text}.
#[prompt_chain]
unsafe fn shout(text: String) -> String {}

fn main() {}

use sextant_prompt::prompt;

#[prompt]
fn undocumented(topic: String) -> String {}

fn main() {}

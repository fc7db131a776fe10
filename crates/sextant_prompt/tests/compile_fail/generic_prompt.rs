use sextant_prompt::prompt;

/// Describe {item}.
#[prompt]
fn describe<T: ToString>(item: T) -> String {}

fn main() {}

use sextant_prompt::prompt;

/// Add {a} and {b}.
#[prompt]
fn add(a: i64, b: i64) -> i64 { a + b }

fn main() {}

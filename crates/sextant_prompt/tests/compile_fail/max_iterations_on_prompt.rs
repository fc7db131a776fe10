use sextant_prompt::prompt;

/// Is {number} prime?
#[prompt(max_iterations = 3)]
fn is_prime(number: u64) -> bool {}

fn main() {}

use sextant_tools::tool;

#[tool]
/// Count the nights between two dates.
fn nights(check_in: u32, check_out: u32) -> u32 {
    check_out - check_in
}

fn main() {}

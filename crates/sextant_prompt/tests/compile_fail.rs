//! Compile-fail tests for `#[prompt]` and `#[prompt_chain]` declarations.

#[test]
fn compile_fail() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/compile_fail/*.rs");
}

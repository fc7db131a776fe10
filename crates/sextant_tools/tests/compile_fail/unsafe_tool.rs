use sextant_tools::tool;

#[tool]
/// Cancel a booking without confirmation.
async unsafe fn cancel_booking(reference: String) -> Result<String, sextant_tools::ToolError> {
    Ok(reference)
}

fn main() {}

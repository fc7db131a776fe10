use sextant_tools::tool;

#[tool]
/// Ping a host.
async extern "C" fn ping(host: String) -> Result<String, sextant_tools::ToolError> {
    Ok(host)
}

fn main() {}

use sextant_tools::tool;

struct Thermometer;

impl Thermometer {
    #[tool]
    /// Read the temperature.
    async fn read(&self, unit: String) -> Result<String, sextant_tools::ToolError> {
        Ok(unit)
    }
}

fn main() {}

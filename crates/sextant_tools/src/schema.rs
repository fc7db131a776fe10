//! Schema types for tool parameter metadata.
//!
//! [`ParameterInfo`] describes one argument; [`FunctionMetadata`] assembles
//! them into the object schema of a [`ToolDefinition`].

use sextant_models::llm::ToolDefinition;
use serde::{Deserialize, Serialize};

/// Schema information for a single tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Parameter name.
    pub name: String,
    /// Parameter description (typically from doc comments).
    pub description: Option<String>,
    /// JSON Schema for this parameter's type.
    pub schema: serde_json::Value,
    /// Whether this parameter is required.
    pub required: bool,
    /// Default value for optional parameters.
    pub default_value: Option<serde_json::Value>,
}

impl ParameterInfo {
    /// Creates a new required parameter with the given name and schema.
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            description: None,
            schema,
            required: true,
            default_value: None,
        }
    }
}

/// Metadata describing a tool function's name, description, and parameters.
///
/// Used to build [`ToolDefinition`] instances with proper JSON Schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// Function name.
    pub name: String,
    /// Function description.
    pub description: Option<String>,
    /// LLM-visible parameters.
    pub parameters: Vec<ParameterInfo>,
    /// Full JSON Schema derived from `parameters`. Use [`Self::schema()`] to read.
    schema: serde_json::Value,
}

impl FunctionMetadata {
    /// Creates new metadata with the given function name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            parameters: Vec::new(),
            schema: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Sets the function description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a parameter and rebuilds the schema.
    #[must_use]
    pub fn add_parameter(mut self, param: ParameterInfo) -> Self {
        self.parameters.push(param);
        self.rebuild_schema();
        self
    }

    /// Returns the full JSON Schema for the function's parameters.
    #[must_use]
    pub fn schema(&self) -> &serde_json::Value {
        &self.schema
    }

    /// Converts this metadata into a [`ToolDefinition`].
    #[must_use]
    pub fn to_tool_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            parameters: self.schema.clone(),
        }
    }

    fn rebuild_schema(&mut self) {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            let mut param_schema = param.schema.clone();
            if let Some(desc) = &param.description
                && let Some(obj) = param_schema.as_object_mut()
            {
                obj.insert(
                    "description".to_string(),
                    serde_json::Value::String(desc.clone()),
                );
            }

            if let Some(default) = &param.default_value
                && let Some(obj) = param_schema.as_object_mut()
            {
                obj.insert("default".to_string(), default.clone());
            }

            properties.insert(param.name.clone(), param_schema);

            if param.required && param.default_value.is_none() {
                required.push(param.name.clone());
            }
        }

        self.schema = serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_and_descriptions_shape_the_schema() {
        let mut city = ParameterInfo::new("city", json!({"type": "string"}));
        city.description = Some("City name.".to_string());
        let mut days = ParameterInfo::new("days", json!({"type": "integer"}));
        days.default_value = Some(json!(3));

        let definition = FunctionMetadata::new("forecast")
            .with_description("Weather forecast.")
            .add_parameter(city)
            .add_parameter(days)
            .to_tool_definition();

        assert_eq!(definition.name, "forecast");
        assert_eq!(definition.description, "Weather forecast.");
        assert_eq!(definition.parameters["required"], json!(["city"]));
        assert_eq!(
            definition.parameters["properties"]["city"]["description"],
            "City name."
        );
        assert_eq!(definition.parameters["properties"]["days"]["default"], 3);
    }
}

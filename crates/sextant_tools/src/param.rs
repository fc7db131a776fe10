//! Parameter extraction traits for tools.
//!
//! - [`FunctionParam`]: base trait for all extractable parameters
//! - [`InputParam`]: model-visible parameters that appear in JSON schema

use crate::error::ToolError;
use crate::schema::ParameterInfo;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Arguments the model supplied for one tool invocation.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolArgs {
    /// Tool name.
    pub name: String,
    /// Arguments as a JSON object map.
    pub parameters: Map<String, Value>,
}

impl ToolArgs {
    /// Creates a new argument set.
    pub fn new(name: impl Into<String>, parameters: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            parameters,
        }
    }

    /// Creates an argument set from a [`Value`], returning an error if
    /// `parameters` is not a JSON object.
    pub fn from_value(name: impl Into<String>, parameters: Value) -> Result<Self, ToolError> {
        match parameters {
            Value::Object(map) => Ok(Self::new(name, map)),
            // Models occasionally send `null` for tools that take no arguments.
            Value::Null => Ok(Self::new(name, Map::new())),
            _ => Err(ToolError::parameter_error("parameters must be an object")),
        }
    }

    /// Deserializes a required parameter by name.
    pub fn get_param<T: DeserializeOwned>(&self, name: &str) -> Result<T, ToolError> {
        let value = self
            .parameters
            .get(name)
            .ok_or_else(|| ToolError::parameter_error(format!("missing parameter: {name}")))?;

        serde_json::from_value(value.clone()).map_err(|err| {
            ToolError::parameter_error(format!("failed to deserialize parameter '{name}': {err}"))
        })
    }

    /// Deserializes an optional parameter by name. Returns `None` if missing or null.
    pub fn get_optional_param<T: DeserializeOwned>(
        &self,
        name: &str,
    ) -> Result<Option<T>, ToolError> {
        match self.parameters.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|err| {
                    ToolError::parameter_error(format!(
                        "failed to deserialize parameter '{name}': {err}"
                    ))
                }),
        }
    }
}

/// Base trait for types that can be extracted as tool parameters.
pub trait FunctionParam {
    /// Extracts a required parameter from the tool arguments.
    fn extract(args: &ToolArgs, param_name: &str) -> Result<Self, ToolError>
    where
        Self: Sized;

    /// Extracts an optional parameter from the tool arguments.
    ///
    /// Returns `Ok(None)` when the parameter is missing or null.
    /// Used by `Option<T>` parameters and `#[default]` parameters.
    fn extract_optional(args: &ToolArgs, param_name: &str) -> Result<Option<Self>, ToolError>
    where
        Self: Sized;
}

/// Trait for parameters that come from model input and appear in JSON schema.
pub trait InputParam: FunctionParam {
    /// Returns schema information for this parameter type.
    fn schema_info(param_name: &str) -> ParameterInfo;
}

impl<T: DeserializeOwned + JsonSchema> FunctionParam for T {
    fn extract(args: &ToolArgs, param_name: &str) -> Result<Self, ToolError> {
        args.get_param(param_name)
    }

    fn extract_optional(args: &ToolArgs, param_name: &str) -> Result<Option<Self>, ToolError> {
        args.get_optional_param(param_name)
    }
}

impl<T: DeserializeOwned + JsonSchema> InputParam for T {
    fn schema_info(param_name: &str) -> ParameterInfo {
        let mut schema_value = inline_schema_for::<T>();
        if let Some(obj) = schema_value.as_object_mut() {
            obj.remove("$schema");
            obj.remove("title");
        }
        ParameterInfo::new(param_name, schema_value)
    }
}

/// Generates a self-contained JSON schema for `T`.
///
/// Subschemas are inlined because the result is embedded as a property of
/// a larger schema, where `#/$defs/..` references would not resolve.
#[must_use]
pub fn inline_schema_for<T: JsonSchema>() -> Value {
    schemars::generate::SchemaSettings::default()
        .with(|settings| settings.inline_subschemas = true)
        .into_generator()
        .into_root_schema_for::<T>()
        .to_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_parameters_are_rejected() {
        assert!(ToolArgs::from_value("t", json!([1, 2])).is_err());
        let args = ToolArgs::from_value("t", Value::Null).unwrap();
        assert!(args.parameters.is_empty());
    }

    #[test]
    fn optional_param_treats_null_as_missing() {
        let args = ToolArgs::from_value("t", json!({"a": null, "b": 2})).unwrap();
        assert_eq!(args.get_optional_param::<i32>("a").unwrap(), None);
        assert_eq!(args.get_optional_param::<i32>("b").unwrap(), Some(2));
        assert_eq!(args.get_optional_param::<i32>("c").unwrap(), None);
    }

    #[test]
    fn required_param_reports_name() {
        let args = ToolArgs::from_value("t", json!({"a": "x"})).unwrap();
        let err = args.get_param::<i32>("a").unwrap_err();
        assert!(err.to_string().contains("'a'"));
        let err = args.get_param::<i32>("missing").unwrap_err();
        assert!(err.to_string().contains("missing parameter: missing"));
    }
}

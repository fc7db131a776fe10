//! Parameter lists and argument binding.
//!
//! A [`Signature`] is the ordered list of a prompt function's parameters plus
//! its declared [`ReturnType`]. [`Signature::bind`] maps call-time
//! [`Arguments`] onto the parameters, applying defaults, and produces
//! [`BoundArguments`] that the template renders from.
//!
//! # Example
//!
//! ```
//! use sextant_prompt::{Arguments, Parameter, ReturnType, Signature};
//!
//! let signature = Signature::new(
//!     vec![Parameter::new("a"), Parameter::new("b").with_default(0)],
//!     ReturnType::of::<i64>(),
//! )
//! .unwrap();
//!
//! let bound = signature.bind(Arguments::new().kwarg("a", 5)).unwrap();
//! assert_eq!(bound.names(), vec!["a", "b"]);
//! assert_eq!(bound.get("b"), Some(&serde_json::json!(0)));
//! ```

use crate::error::{BindingError, SignatureError};
use crate::output::ReturnType;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

/// How an argument may be supplied for a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ParamKind {
    /// Only by position.
    PositionalOnly,
    /// By position or by name.
    #[default]
    PositionalOrKeyword,
    /// Only by name.
    KeywordOnly,
}

impl ParamKind {
    /// Returns whether arguments of this kind may be supplied by position.
    #[must_use]
    pub fn accepts_positional(self) -> bool {
        !matches!(self, Self::KeywordOnly)
    }

    /// Returns whether arguments of this kind may be supplied by name.
    #[must_use]
    pub fn accepts_keyword(self) -> bool {
        !matches!(self, Self::PositionalOnly)
    }
}

/// One declared parameter of a prompt function.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    kind: ParamKind,
    default: Option<Value>,
    description: Option<String>,
}

impl Parameter {
    /// Creates a required positional-or-keyword parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParamKind::PositionalOrKeyword,
            default: None,
            description: None,
        }
    }

    /// Creates a required positional-only parameter.
    pub fn positional_only(name: impl Into<String>) -> Self {
        Self::new(name).with_kind(ParamKind::PositionalOnly)
    }

    /// Creates a required keyword-only parameter.
    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name).with_kind(ParamKind::KeywordOnly)
    }

    /// Sets the parameter kind.
    #[must_use]
    pub fn with_kind(mut self, kind: ParamKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the value used when the argument is omitted.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets a human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter kind.
    #[must_use]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns whether the argument may be omitted.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.default.is_some()
    }
}

/// A prompt function's parameters and declared return type.
#[derive(Debug, Clone)]
pub struct Signature {
    parameters: Vec<Parameter>,
    return_type: ReturnType,
}

impl Signature {
    /// Creates a signature, validating the parameter list.
    ///
    /// # Errors
    ///
    /// Returns a [`SignatureError`] if a name is empty or repeated, if kinds
    /// are not ordered positional-only, positional-or-keyword, keyword-only,
    /// or if a required positional parameter follows a defaulted one.
    pub fn new(parameters: Vec<Parameter>, return_type: ReturnType) -> Result<Self, SignatureError> {
        let mut seen = HashSet::new();
        let mut previous_kind = ParamKind::PositionalOnly;
        let mut positional_default = false;

        for param in &parameters {
            if param.name.is_empty() {
                return Err(SignatureError::EmptyName);
            }
            if !seen.insert(param.name.as_str()) {
                return Err(SignatureError::DuplicateParameter {
                    name: param.name.clone(),
                });
            }
            if param.kind < previous_kind {
                return Err(SignatureError::KindOrder {
                    name: param.name.clone(),
                });
            }
            previous_kind = param.kind;

            if param.kind.accepts_positional() {
                if param.default.is_some() {
                    positional_default = true;
                } else if positional_default {
                    return Err(SignatureError::NonDefaultAfterDefault {
                        name: param.name.clone(),
                    });
                }
            }
        }

        Ok(Self {
            parameters,
            return_type,
        })
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|param| param.name == name)
    }

    /// Returns the declared return type.
    #[must_use]
    pub fn return_type(&self) -> &ReturnType {
        &self.return_type
    }

    /// Returns the number of parameters that accept positional arguments.
    #[must_use]
    pub fn positional_count(&self) -> usize {
        self.parameters
            .iter()
            .take_while(|param| param.kind.accepts_positional())
            .count()
    }

    /// Binds call arguments to parameter names.
    ///
    /// The result holds one value per parameter, in signature order, with
    /// defaults filled in for omitted arguments.
    ///
    /// # Errors
    ///
    /// Returns a [`BindingError`] if the arguments do not fit the signature.
    pub fn bind(&self, args: Arguments) -> Result<BoundArguments, BindingError> {
        let positional_count = self.positional_count();
        let supplied_positional = args.positional_len();
        if supplied_positional > positional_count {
            return Err(BindingError::TooManyPositional {
                expected: positional_count,
                got: supplied_positional,
            });
        }

        let mut bound: IndexMap<&str, Value> = IndexMap::with_capacity(self.parameters.len());
        let mut next_position = 0;

        for argument in args.entries {
            match argument {
                Argument::Positional(value) => {
                    let param = &self.parameters[next_position];
                    if bound.contains_key(param.name.as_str()) {
                        return Err(BindingError::PositionalAfterKeyword {
                            name: param.name.clone(),
                        });
                    }
                    bound.insert(&param.name, value);
                    next_position += 1;
                }
                Argument::Keyword(name, value) => {
                    let Some(param) = self.parameter(&name) else {
                        return Err(BindingError::UnknownKeyword { name });
                    };
                    if !param.kind.accepts_keyword() {
                        return Err(BindingError::PositionalOnlyAsKeyword { name });
                    }
                    if bound.contains_key(param.name.as_str()) {
                        return Err(BindingError::MultipleValues { name });
                    }
                    bound.insert(&param.name, value);
                }
            }
        }

        let mut values = IndexMap::with_capacity(self.parameters.len());
        for param in &self.parameters {
            let value = match bound.swap_remove(param.name.as_str()) {
                Some(value) => value,
                None => param
                    .default
                    .clone()
                    .ok_or_else(|| BindingError::MissingArgument {
                        name: param.name.clone(),
                    })?,
            };
            values.insert(param.name.clone(), value);
        }

        Ok(BoundArguments { values })
    }
}

/// One call-site argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// Supplied by position.
    Positional(Value),
    /// Supplied by name.
    Keyword(String, Value),
}

/// Ordered positional and keyword arguments for one call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<Argument>,
}

impl Arguments {
    /// Creates an empty argument list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.entries.push(Argument::Positional(value.into()));
        self
    }

    /// Appends a keyword argument.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries
            .push(Argument::Keyword(name.into(), value.into()));
        self
    }

    /// Appends a positional argument serialized from any [`Serialize`] value.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::Unserializable`] if the value has no JSON form.
    pub fn try_arg<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, BindingError> {
        let position = self.positional_len();
        let value = to_argument(&format!("#{position}"), value)?;
        Ok(self.arg(value))
    }

    /// Appends a keyword argument serialized from any [`Serialize`] value.
    ///
    /// # Errors
    ///
    /// Returns [`BindingError::Unserializable`] if the value has no JSON form.
    pub fn try_kwarg<T: Serialize + ?Sized>(
        self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<Self, BindingError> {
        let name = name.into();
        let value = to_argument(&name, value)?;
        Ok(self.kwarg(name, value))
    }

    /// Returns the arguments in call order.
    #[must_use]
    pub fn entries(&self) -> &[Argument] {
        &self.entries
    }

    /// Returns the number of positional arguments.
    #[must_use]
    pub fn positional_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| matches!(entry, Argument::Positional(_)))
            .count()
    }

    /// Returns whether no arguments were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Serializes a typed argument for binding.
///
/// # Errors
///
/// Returns [`BindingError::Unserializable`] naming `name` if serialization fails.
pub fn to_argument<T: Serialize + ?Sized>(name: &str, value: &T) -> Result<Value, BindingError> {
    serde_json::to_value(value).map_err(|err| BindingError::Unserializable {
        name: name.to_string(),
        reason: err.to_string(),
    })
}

/// Arguments bound to parameter names, in signature order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    values: IndexMap<String, Value>,
}

impl BoundArguments {
    /// Returns the value bound to a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns the bound parameter names in signature order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.values.keys().map(String::as_str).collect()
    }

    /// Iterates over `(name, value)` pairs in signature order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Converts the binding into a JSON object.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(self.values.clone().into_iter().collect())
    }
}

impl FromIterator<(String, Value)> for BoundArguments {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn add_signature() -> Signature {
        Signature::new(
            vec![Parameter::new("a"), Parameter::new("b").with_default(0)],
            ReturnType::of::<String>(),
        )
        .unwrap()
    }

    #[test]
    fn defaults_fill_omitted_arguments() {
        let bound = add_signature()
            .bind(Arguments::new().kwarg("a", 5))
            .unwrap();
        assert_eq!(bound.names(), vec!["a", "b"]);
        assert_eq!(bound.get("a"), Some(&json!(5)));
        assert_eq!(bound.get("b"), Some(&json!(0)));
    }

    #[test]
    fn keys_follow_signature_order() {
        let bound = add_signature()
            .bind(Arguments::new().kwarg("b", 3).kwarg("a", 5))
            .unwrap();
        assert_eq!(bound.names(), vec!["a", "b"]);
    }

    #[test]
    fn binding_is_deterministic() {
        let signature = add_signature();
        let args = Arguments::new().arg(5).kwarg("b", 3);
        assert_eq!(
            signature.bind(args.clone()).unwrap(),
            signature.bind(args).unwrap()
        );
    }

    #[test]
    fn missing_required_argument() {
        let err = add_signature().bind(Arguments::new()).unwrap_err();
        assert_eq!(
            err,
            BindingError::MissingArgument {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn unknown_keyword() {
        let err = add_signature()
            .bind(Arguments::new().kwarg("a", 1).kwarg("c", 2))
            .unwrap_err();
        assert_eq!(
            err,
            BindingError::UnknownKeyword {
                name: "c".to_string()
            }
        );
    }

    #[test]
    fn too_many_positional() {
        let err = add_signature()
            .bind(Arguments::new().arg(1).arg(2).arg(3))
            .unwrap_err();
        assert_eq!(
            err,
            BindingError::TooManyPositional {
                expected: 2,
                got: 3
            }
        );
    }

    #[test]
    fn positional_after_keyword_for_same_parameter() {
        let err = add_signature()
            .bind(Arguments::new().kwarg("a", 1).arg(2))
            .unwrap_err();
        assert_eq!(
            err,
            BindingError::PositionalAfterKeyword {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn positional_after_keyword_for_later_parameter() {
        let bound = add_signature()
            .bind(Arguments::new().kwarg("b", 3).arg(5))
            .unwrap();
        assert_eq!(bound.get("a"), Some(&json!(5)));
        assert_eq!(bound.get("b"), Some(&json!(3)));
    }

    #[test]
    fn keyword_repeats_positional() {
        let err = add_signature()
            .bind(Arguments::new().arg(1).kwarg("a", 2))
            .unwrap_err();
        assert_eq!(
            err,
            BindingError::MultipleValues {
                name: "a".to_string()
            }
        );
    }

    #[test]
    fn kinds_restrict_how_arguments_bind() {
        let signature = Signature::new(
            vec![
                Parameter::positional_only("x"),
                Parameter::new("y"),
                Parameter::keyword_only("z").with_default("zed"),
            ],
            ReturnType::of::<String>(),
        )
        .unwrap();

        let err = signature
            .bind(Arguments::new().kwarg("x", 1).kwarg("y", 2))
            .unwrap_err();
        assert!(matches!(err, BindingError::PositionalOnlyAsKeyword { .. }));

        let err = signature
            .bind(Arguments::new().arg(1).arg(2).arg(3))
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::TooManyPositional {
                expected: 2,
                got: 3
            }
        ));

        let bound = signature.bind(Arguments::new().arg(1).arg(2)).unwrap();
        assert_eq!(bound.get("z"), Some(&json!("zed")));
    }

    #[test]
    fn invalid_parameter_lists_are_rejected() {
        let duplicate = Signature::new(
            vec![Parameter::new("a"), Parameter::new("a")],
            ReturnType::of::<String>(),
        );
        assert!(matches!(
            duplicate,
            Err(SignatureError::DuplicateParameter { .. })
        ));

        let order = Signature::new(
            vec![Parameter::keyword_only("a"), Parameter::new("b")],
            ReturnType::of::<String>(),
        );
        assert!(matches!(order, Err(SignatureError::KindOrder { .. })));

        let defaults = Signature::new(
            vec![Parameter::new("a").with_default(1), Parameter::new("b")],
            ReturnType::of::<String>(),
        );
        assert!(matches!(
            defaults,
            Err(SignatureError::NonDefaultAfterDefault { .. })
        ));

        let keyword_only_required = Signature::new(
            vec![
                Parameter::new("a").with_default(1),
                Parameter::keyword_only("b"),
            ],
            ReturnType::of::<String>(),
        );
        assert!(keyword_only_required.is_ok());
    }

    #[test]
    fn unserializable_arguments_are_reported() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let mut map = HashMap::new();
        map.insert(vec![1u8], 1);
        let err = Arguments::new().try_kwarg("map", &map).unwrap_err();
        assert!(matches!(err, BindingError::Unserializable { ref name, .. } if name == "map"));
    }
}

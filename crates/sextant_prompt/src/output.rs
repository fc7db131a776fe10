//! Output types and return-type resolution.
//!
//! Every prompt function declares a Rust return type implementing
//! [`PromptReturn`]. That type describes itself as a [`ReturnType`]: a single
//! [`OutputType`] or a union of them. Resolving the descriptor flattens the
//! union and drops the tool-call markers, leaving the data types the backend
//! may answer with.
//!
//! | Rust return type | Resolved output types |
//! |------------------|-----------------------|
//! | `T` (`DeserializeOwned + JsonSchema`) | `[T]` |
//! | `FunctionCall<R>` | `[]` |
//! | `Either<A, B>` | `resolve(A) ++ resolve(B)` |
//!
//! ```
//! use sextant_prompt::{Either, FunctionCall, PromptReturn};
//!
//! #[derive(serde::Deserialize, schemars::JsonSchema)]
//! struct Answer {
//!     text: String,
//! }
//!
//! let types = <Either<Answer, FunctionCall<String>>>::return_type().resolve();
//! assert_eq!(types.len(), 1);
//! assert_eq!(types[0].name(), "answer");
//! ```

use crate::backend::{Completion, ToolInvocation};
use crate::error::OutputError;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use sextant_tools::ToolError;
use std::any::TypeId;
use std::marker::PhantomData;

/// Whether an output type carries data or marks a tool invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    /// A value the backend returns directly.
    Data,
    /// A request to invoke one of the prompt's tools instead.
    ToolCall,
}

/// One member of a return-type descriptor.
#[derive(Clone)]
pub struct OutputType {
    type_id: TypeId,
    rust_name: &'static str,
    name: String,
    kind: OutputKind,
    schema: Value,
}

impl OutputType {
    /// Describes a data output type.
    #[must_use]
    pub fn data<T: JsonSchema + 'static>() -> Self {
        let mut schema = sextant_tools::param::inline_schema_for::<T>();
        if let Some(obj) = schema.as_object_mut() {
            obj.remove("$schema");
        }
        Self {
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            name: sanitize_name(&T::schema_name()),
            kind: OutputKind::Data,
            schema,
        }
    }

    /// Describes a tool-call marker type.
    #[must_use]
    pub fn tool_call<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            rust_name: std::any::type_name::<T>(),
            name: "function_call".to_string(),
            kind: OutputKind::ToolCall,
            schema: Value::Null,
        }
    }

    /// Returns the identity of the Rust type.
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Returns the full Rust type name.
    #[must_use]
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    /// Returns the lower-case name derived from the JSON schema (e.g. `array_of_string`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the output kind.
    #[must_use]
    pub fn kind(&self) -> OutputKind {
        self.kind
    }

    /// Returns the JSON schema of the type. `null` for tool-call markers.
    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Returns whether this is the plain-text `String` type.
    #[must_use]
    pub fn is_string(&self) -> bool {
        self.type_id == TypeId::of::<String>()
    }

    /// Returns whether this type marks a tool invocation.
    #[must_use]
    pub fn is_tool_call(&self) -> bool {
        self.kind == OutputKind::ToolCall
    }

    /// Returns whether this describes the Rust type `T`.
    #[must_use]
    pub fn is<T: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl PartialEq for OutputType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for OutputType {}

impl core::fmt::Debug for OutputType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OutputType")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("rust_name", &self.rust_name)
            .finish_non_exhaustive()
    }
}

/// A declared return type: one output type or a union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnType {
    /// A single type.
    Single(OutputType),
    /// A union of types, possibly nested.
    Union(Vec<ReturnType>),
}

impl ReturnType {
    /// Returns the descriptor of a [`PromptReturn`] type.
    #[must_use]
    pub fn of<T: PromptReturn>() -> Self {
        T::return_type()
    }

    /// Flattens nested unions, keeping first occurrences in order.
    ///
    /// Tool-call markers are kept.
    #[must_use]
    pub fn flatten(&self) -> Vec<OutputType> {
        let mut members = Vec::new();
        self.collect_into(&mut members);
        members
    }

    /// Returns the set of data types the backend may answer with.
    ///
    /// Nested unions are flattened, duplicates removed by type identity, and
    /// every tool-call marker dropped whatever it is parameterized with.
    #[must_use]
    pub fn resolve(&self) -> Vec<OutputType> {
        self.flatten()
            .into_iter()
            .filter(|member| !member.is_tool_call())
            .collect()
    }

    /// Returns whether any member is a tool-call marker.
    #[must_use]
    pub fn has_tool_call(&self) -> bool {
        match self {
            Self::Single(output_type) => output_type.is_tool_call(),
            Self::Union(members) => members.iter().any(Self::has_tool_call),
        }
    }

    /// Returns whether a completion carrying `output_type` belongs to this descriptor.
    #[must_use]
    pub fn accepts(&self, output_type: &OutputType) -> bool {
        self.resolve().contains(output_type)
    }

    fn collect_into(&self, members: &mut Vec<OutputType>) {
        match self {
            Self::Single(output_type) => {
                if !members.contains(output_type) {
                    members.push(output_type.clone());
                }
            }
            Self::Union(variants) => {
                for variant in variants {
                    variant.collect_into(members);
                }
            }
        }
    }
}

/// A Rust type a prompt function may return.
///
/// Implemented for every `T: DeserializeOwned + JsonSchema`, for the
/// tool-call marker [`FunctionCall<R>`] and for unions built with
/// [`Either`].
pub trait PromptReturn: Sized + Send + 'static {
    /// Describes the type as a return-type descriptor.
    fn return_type() -> ReturnType;

    /// Converts a backend completion into this type.
    ///
    /// # Errors
    ///
    /// Returns an [`OutputError`] if the completion does not match.
    fn from_completion(completion: Completion) -> Result<Self, OutputError>;
}

impl<T> PromptReturn for T
where
    T: DeserializeOwned + JsonSchema + Send + 'static,
{
    fn return_type() -> ReturnType {
        ReturnType::Single(OutputType::data::<T>())
    }

    fn from_completion(completion: Completion) -> Result<Self, OutputError> {
        match completion {
            Completion::Data { output_type, value } => {
                if !output_type.is::<T>() {
                    return Err(OutputError::UnexpectedType {
                        expected: T::schema_name().into_owned(),
                        got: output_type.name().to_string(),
                    });
                }
                serde_json::from_value(value).map_err(|source| OutputError::Deserialize {
                    type_name: output_type.rust_name().to_string(),
                    source,
                })
            }
            Completion::ToolCall(invocation) => Err(OutputError::UnexpectedToolCall {
                tool: invocation.name(),
            }),
        }
    }
}

/// A tool invocation returned to the caller instead of data.
///
/// Declaring `FunctionCall<R>` in a return type lets the model answer by
/// choosing one of the prompt's tools. The caller decides whether to run it;
/// [`call`](Self::call) executes the tool and deserializes its output as `R`.
pub struct FunctionCall<R> {
    invocation: ToolInvocation,
    _output: PhantomData<fn() -> R>,
}

impl<R> FunctionCall<R> {
    /// Wraps a tool invocation.
    #[must_use]
    pub fn new(invocation: ToolInvocation) -> Self {
        Self {
            invocation,
            _output: PhantomData,
        }
    }

    /// Returns the name of the chosen tool.
    #[must_use]
    pub fn name(&self) -> String {
        self.invocation.name()
    }

    /// Returns the arguments the model chose.
    #[must_use]
    pub fn arguments(&self) -> &Value {
        &self.invocation.arguments
    }

    /// Returns the underlying invocation.
    #[must_use]
    pub fn invocation(&self) -> &ToolInvocation {
        &self.invocation
    }

    /// Unwraps the underlying invocation.
    #[must_use]
    pub fn into_invocation(self) -> ToolInvocation {
        self.invocation
    }
}

impl<R: DeserializeOwned> FunctionCall<R> {
    /// Executes the tool and deserializes its output.
    ///
    /// # Errors
    ///
    /// Returns the tool's [`ToolError`], or
    /// [`ToolError::SerializationError`] if the output is not an `R`.
    pub async fn call(&self) -> Result<R, ToolError> {
        let output = self.invocation.execute().await?;
        Ok(serde_json::from_value(output)?)
    }
}

impl<R> Clone for FunctionCall<R> {
    fn clone(&self) -> Self {
        Self::new(self.invocation.clone())
    }
}

impl<R> core::fmt::Debug for FunctionCall<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FunctionCall")
            .field("name", &self.name())
            .field("arguments", self.arguments())
            .finish()
    }
}

impl<R: Send + 'static> PromptReturn for FunctionCall<R> {
    fn return_type() -> ReturnType {
        ReturnType::Single(OutputType::tool_call::<Self>())
    }

    fn from_completion(completion: Completion) -> Result<Self, OutputError> {
        match completion {
            Completion::ToolCall(invocation) => Ok(Self::new(invocation)),
            Completion::Data { output_type, .. } => Err(OutputError::ExpectedToolCall {
                got: output_type.name().to_string(),
            }),
        }
    }
}

/// A union of two return types. Nest to express larger unions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Either<L, R> {
    /// The first member.
    Left(L),
    /// The second member.
    Right(R),
}

impl<L, R> Either<L, R> {
    /// Returns whether this is [`Either::Left`].
    #[must_use]
    pub fn is_left(&self) -> bool {
        matches!(self, Self::Left(_))
    }

    /// Returns whether this is [`Either::Right`].
    #[must_use]
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right(_))
    }

    /// Returns the left value, if any.
    #[must_use]
    pub fn left(self) -> Option<L> {
        match self {
            Self::Left(value) => Some(value),
            Self::Right(_) => None,
        }
    }

    /// Returns the right value, if any.
    #[must_use]
    pub fn right(self) -> Option<R> {
        match self {
            Self::Left(_) => None,
            Self::Right(value) => Some(value),
        }
    }
}

impl<L: PromptReturn, R: PromptReturn> PromptReturn for Either<L, R> {
    fn return_type() -> ReturnType {
        ReturnType::Union(vec![L::return_type(), R::return_type()])
    }

    fn from_completion(completion: Completion) -> Result<Self, OutputError> {
        let left = L::return_type();
        let is_left = match &completion {
            Completion::Data { output_type, .. } => left.accepts(output_type),
            Completion::ToolCall(_) => left.has_tool_call(),
        };

        if is_left {
            L::from_completion(completion).map(Self::Left)
        } else {
            R::from_completion(completion).map(Self::Right)
        }
    }
}

/// Lower-cases a schema name and replaces anything outside `[a-z0-9_]`.
fn sanitize_name(schema_name: &str) -> String {
    let mut name = String::with_capacity(schema_name.len());
    for c in schema_name.chars() {
        if c.is_ascii_alphanumeric() {
            name.push(c.to_ascii_lowercase());
        } else if !name.ends_with('_') {
            name.push('_');
        }
    }
    let trimmed = name.trim_matches('_');
    if trimmed.is_empty() {
        "value".to_string()
    } else {
        trimmed.to_string()
    }
}

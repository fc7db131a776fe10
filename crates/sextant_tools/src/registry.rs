//! Tool registry.
//!
//! The [`ToolRegistry`] stores tools in registration order, keyed by name.
//! Tools are held behind [`Arc`] so the same callable can be handed to a
//! backend without being copied or re-wrapped.
//!
//! # Usage
//!
//! ```
//! use sextant_tools::{tool, ToolError, ToolRegistry};
//!
//! #[tool]
//! /// Look up a city's population.
//! async fn population(city: String) -> Result<u64, ToolError> {
//!     Ok(if city == "Dublin" { 592_713 } else { 0 })
//! }
//!
//! let mut registry = ToolRegistry::new();
//! registry.try_register(population()).unwrap();
//! assert!(registry.try_register(population()).is_err());
//! assert_eq!(registry.names(), vec!["population"]);
//! ```

use crate::error::ToolError;
use crate::tool::Tool;
use indexmap::IndexMap;
use sextant_models::llm::ToolDefinition;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Registry of available tools.
///
/// Stores tools by name and provides lookup, execution, and definition listing.
/// Collection accessors return fresh vectors; the backing map is never exposed.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl core::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Registers a tool.
    ///
    /// # Panics
    ///
    /// Panics if a tool with the same name is already registered.
    pub fn register(&mut self, tool: impl Tool) {
        if let Err(err) = self.try_register(tool) {
            panic!("{err}");
        }
    }

    /// Registers a tool, failing if the name is taken.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateTool`] if a tool with the same name is
    /// already registered.
    pub fn try_register(&mut self, tool: impl Tool) -> Result<(), ToolError> {
        self.try_register_shared(Arc::new(tool))
    }

    /// Registers an already shared tool without re-wrapping it.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::DuplicateTool`] if a tool with the same name is
    /// already registered.
    pub fn try_register_shared(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolError> {
        let name = tool.name();
        if self.tools.contains_key(&name) {
            return Err(ToolError::DuplicateTool(name));
        }
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Executes a tool by name with JSON arguments.
    pub fn execute<'a>(
        &'a self,
        name: &'a str,
        args: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<serde_json::Value, ToolError>> + Send + 'a>> {
        let tool = self.tools.get(name).cloned();
        let args = args.clone();
        Box::pin(async move {
            let tool = tool.ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
            tool.execute(args).await
        })
    }

    /// Returns tool definitions for all registered tools.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Returns the registered tools in registration order.
    #[must_use]
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    /// Returns a reference to a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(AsRef::as_ref)
    }

    /// Returns whether a tool with the given name is registered.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the names of all registered tools.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns whether no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

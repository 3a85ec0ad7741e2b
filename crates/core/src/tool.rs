//! Tool trait: the capability contract every integration satisfies.
//!
//! Tools are what give the agent the ability to act in the world:
//! look up a podcast feed, transcribe audio, hand back a final answer.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Parameters passed to a tool: a mapping of string to arbitrary value.
pub type ToolParams = serde_json::Map<String, serde_json::Value>;

/// Static description of a tool, used to render the catalog sent to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// The tool's own declared name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema describing the tool's parameters. Advisory only.
    pub parameters: serde_json::Value,
}

/// The core Tool trait.
///
/// Parameters are **not** validated against [`Tool::parameters_schema`]
/// before `execute` is called; a tool rejects bad input itself with
/// [`ToolError::InvalidArguments`].
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's declared name. May differ from its registry key.
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the LLM).
    fn description(&self) -> &str;

    /// JSON Schema describing this tool's parameters.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool with the given parameters.
    async fn execute(&self, params: ToolParams) -> std::result::Result<serde_json::Value, ToolError>;

    /// Pure, side-effect-free description of this tool.
    fn describe(&self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

/// A registry of available tools, keyed by registry key.
///
/// The registry key, not [`Tool::name`], is what the model must put in
/// an action's `tool` field. Keys are kept ordered so the rendered
/// catalog is identical across runs.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool under `key`. Replaces any existing tool with the same key.
    pub fn register(&mut self, key: impl Into<String>, tool: Box<dyn Tool>) {
        let key = key.into();
        if self.tools.insert(key.clone(), tool).is_some() {
            debug!(key = %key, "Replaced tool registration");
        }
    }

    /// Get a tool by registry key.
    pub fn get(&self, key: &str) -> Option<&dyn Tool> {
        self.tools.get(key).map(|t| t.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.tools.contains_key(key)
    }

    /// All registry keys, in catalog order.
    pub fn keys(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// `(registry key, descriptor)` pairs for every tool.
    pub fn descriptors(&self) -> Vec<(String, ToolDescriptor)> {
        self.tools
            .iter()
            .map(|(key, tool)| (key.clone(), tool.describe()))
            .collect()
    }

    /// Render the textual tool catalog embedded in each prompt.
    ///
    /// One entry per tool: `"<key>: <description> Parameters: <schema>"`,
    /// where the schema is compact JSON.
    pub fn catalog(&self) -> String {
        self.tools
            .iter()
            .map(|(key, tool)| {
                let schema = tool.parameters_schema();
                let schema = if schema.is_null() {
                    "{}".to_string()
                } else {
                    schema.to_string()
                };
                format!("{key}: {} Parameters: {schema}\n", tool.description())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

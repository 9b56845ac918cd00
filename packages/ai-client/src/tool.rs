//! Tool definitions and tool calls for function calling.

use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AiError, Result};
use crate::schema::parameters_schema;

/// A function the model may be asked to call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,

    /// JSON schema for the function's arguments.
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Build a definition whose parameters schema is derived from `T`.
    pub fn for_args<T: JsonSchema>(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: parameters_schema::<T>(),
        }
    }

    /// Convert to the chat-completions `tools` entry format.
    pub fn to_wire_format(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

/// A tool call made by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,

    /// Arguments as the raw JSON string the model produced.
    pub arguments: String,
}

impl ToolCall {
    /// Parse arguments into a typed struct.
    pub fn parse_args<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.arguments).map_err(|e| {
            AiError::Parse(format!("Invalid arguments for `{}`: {}", self.name, e))
        })
    }
}

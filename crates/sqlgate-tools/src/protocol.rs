//! Tool protocol types.
//!
//! Definitions advertised to callers and the messages a tool invocation emits.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition advertised to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<ToolAnnotations>,
}

/// Tool annotations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ToolAnnotations {
    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
}

/// One message in a tool invocation's output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolMessage {
    /// A named output variable.
    #[serde(rename = "variable")]
    Variable { name: String, value: Value },
    /// A structured summary.
    #[serde(rename = "json")]
    Json { json: Value },
}

impl ToolMessage {
    pub fn variable(name: impl Into<String>, value: Value) -> Self {
        ToolMessage::Variable {
            name: name.into(),
            value,
        }
    }

    pub fn json(json: Value) -> Self {
        ToolMessage::Json { json }
    }
}

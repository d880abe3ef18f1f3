//! Agent domain types

use serde::{Deserialize, Serialize};

use super::DEFAULT_MODEL;

/// Agent variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentVariant {
    /// A single persona answering directly
    #[default]
    Standard,
    /// A coordinating agent expected to delegate to tools or sub-agents
    Super,
}

impl std::fmt::Display for AgentVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentVariant::Standard => write!(f, "standard"),
            AgentVariant::Super => write!(f, "super"),
        }
    }
}

/// A configured persona that can be invoked to answer a prompt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    /// Unique identifier (generated when empty on create)
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "system_instruction")]
    pub system_instruction: String,
    /// IDs of enabled tools; not checked against the tool collection
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default, rename = "type")]
    pub variant: AgentVariant,
}

impl Agent {
    /// Create an agent with the default model and no tools
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: String::new(),
            description: String::new(),
            system_instruction: String::new(),
            tools: Vec::new(),
            model: DEFAULT_MODEL.to_string(),
            variant: AgentVariant::Standard,
        }
    }

    /// Model to call, falling back to the default when unset
    pub fn model_or_default(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_MODEL
        } else {
            model
        }
    }

    pub fn has_tool(&self, tool_id: &str) -> bool {
        self.tools.iter().any(|t| t == tool_id)
    }
}

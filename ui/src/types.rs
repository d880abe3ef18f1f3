//! Shared types for the Hangar Web UI
//!
//! These types mirror the backend API response structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Generic API response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Dashboard figures
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub agents: usize,
    pub tools: usize,
    pub connections: usize,
    pub connected_connections: usize,
    pub sandbox_sessions: usize,
    pub sandbox_turns: u64,
    pub failed_turns: u64,
    pub success_rate: f64,
    pub tokens_used: u64,
}

/// `/health` body; only the parts the UI shows
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthChecks {
    pub credential: String,
    pub agents: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ModelOption {
    pub id: String,
    pub label: String,
}

// ============================================================================
// Agents
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentVariant {
    #[default]
    Standard,
    Super,
}

impl AgentVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentVariant::Standard => "standard",
            AgentVariant::Super => "super",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "super" => AgentVariant::Super,
            _ => AgentVariant::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Agent {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub system_instruction: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default, rename = "type")]
    pub variant: AgentVariant,
}

// ============================================================================
// Tools
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    #[default]
    String,
    Number,
    Boolean,
}

impl ParameterType {
    pub const ALL: [ParameterType; 3] = [ParameterType::String, ParameterType::Number, ParameterType::Boolean];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "number" => ParameterType::Number,
            "boolean" => ParameterType::Boolean,
            _ => ParameterType::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct ToolParameter {
    pub name: String,
    #[serde(default, rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<ToolParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,
}

// ============================================================================
// Connections
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    #[default]
    Database,
    Crm,
    RestApi,
    Webhook,
}

impl ConnectionType {
    pub const ALL: [ConnectionType; 4] = [
        ConnectionType::Database,
        ConnectionType::Crm,
        ConnectionType::RestApi,
        ConnectionType::Webhook,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionType::Database => "DATABASE",
            ConnectionType::Crm => "CRM",
            ConnectionType::RestApi => "REST_API",
            ConnectionType::Webhook => "WEBHOOK",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConnectionType::Database => "Database",
            ConnectionType::Crm => "CRM",
            ConnectionType::RestApi => "REST API",
            ConnectionType::Webhook => "Webhook",
        }
    }

    pub fn parse(value: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == value)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Connected,
    Error,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Connection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub status: ConnectionStatus,
}

// ============================================================================
// Sandbox
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
    Tool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: Role,
    pub content: String,
    /// RFC 3339
    pub timestamp: String,
    #[serde(default)]
    pub function_calls: Vec<FunctionCall>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Sending,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub agent_id: Option<String>,
    pub state: SessionState,
    pub messages: Vec<Message>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAgentRequest {
    pub agent_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SetSecretRequest {
    pub value: String,
}

//! Connection types: placeholder records for external systems

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionType {
    Database,
    Crm,
    #[default]
    RestApi,
    Webhook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Connected,
    Error,
    Pending,
}

/// An external integration a tool might use; never wired to a live backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, rename = "type")]
    pub connection_type: ConnectionType,
    /// Opaque string settings; nothing interprets them
    #[serde(default)]
    pub config: BTreeMap<String, String>,
    #[serde(default)]
    pub status: ConnectionStatus,
}

impl Connection {
    pub fn new(id: impl Into<String>, name: impl Into<String>, connection_type: ConnectionType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            connection_type,
            config: BTreeMap::new(),
            status: ConnectionStatus::Connected,
        }
    }
}

//! Workspace store: the single owner of agents, tools and connections.
//!
//! Collections are ordered (insertion order) and guarded by `RwLock`s.
//! Handlers and the sandbox share one `Arc<WorkspaceStore>`.

use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::{new_id, Agent, Connection, ConnectionStatus, Tool, DEFAULT_MODEL};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A required field was blank; the collection is unchanged
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("{kind} already exists: {id}")]
    Conflict { kind: &'static str, id: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Snapshot of collection sizes for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkspaceCounts {
    pub agents: usize,
    pub tools: usize,
    pub connections: usize,
    pub connected: usize,
}

#[derive(Debug, Default)]
pub struct WorkspaceStore {
    agents: RwLock<Vec<Agent>>,
    tools: RwLock<Vec<Tool>>,
    connections: RwLock<Vec<Connection>>,
}

pub type SharedWorkspaceStore = Arc<WorkspaceStore>;

fn require(value: &str, field: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        warn!(field, "Rejected save with blank field");
        return Err(StoreError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

fn ensure_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = new_id();
    }
}

impl WorkspaceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-validated seed entries
    pub fn seeded(agents: Vec<Agent>, tools: Vec<Tool>, connections: Vec<Connection>) -> Self {
        info!(
            agents = agents.len(),
            tools = tools.len(),
            connections = connections.len(),
            "Seeding workspace"
        );
        Self {
            agents: RwLock::new(agents),
            tools: RwLock::new(tools),
            connections: RwLock::new(connections),
        }
    }

    pub async fn counts(&self) -> WorkspaceCounts {
        let connections = self.connections.read().await;
        WorkspaceCounts {
            agents: self.agents.read().await.len(),
            tools: self.tools.read().await.len(),
            connections: connections.len(),
            connected: connections
                .iter()
                .filter(|c| c.status == ConnectionStatus::Connected)
                .count(),
        }
    }

    // Agents

    pub async fn list_agents(&self) -> Vec<Agent> {
        self.agents.read().await.clone()
    }

    pub async fn get_agent(&self, id: &str) -> Option<Agent> {
        self.agents.read().await.iter().find(|a| a.id == id).cloned()
    }

    pub async fn first_agent(&self) -> Option<Agent> {
        self.agents.read().await.first().cloned()
    }

    /// Insert or replace by id. Returns the stored agent and whether it was new.
    pub async fn save_agent(&self, mut agent: Agent) -> StoreResult<(Agent, bool)> {
        Self::check_agent(&mut agent)?;
        ensure_id(&mut agent.id);

        let mut agents = self.agents.write().await;
        match agents.iter_mut().find(|a| a.id == agent.id) {
            Some(existing) => {
                *existing = agent.clone();
                Ok((agent, false))
            }
            None => {
                agents.push(agent.clone());
                Ok((agent, true))
            }
        }
    }

    /// Replace an existing agent. The lookup and the write share one guard.
    pub async fn update_agent(&self, id: &str, mut agent: Agent) -> StoreResult<Agent> {
        Self::check_agent(&mut agent)?;
        agent.id = id.to_string();

        let mut agents = self.agents.write().await;
        let existing = agents
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Agent",
                id: id.to_string(),
            })?;
        *existing = agent.clone();
        Ok(agent)
    }

    fn check_agent(agent: &mut Agent) -> StoreResult<()> {
        require(&agent.name, "name")?;
        if agent.model.trim().is_empty() {
            agent.model = DEFAULT_MODEL.to_string();
        }
        Ok(())
    }

    pub async fn delete_agent(&self, id: &str) -> bool {
        let mut agents = self.agents.write().await;
        let before = agents.len();
        agents.retain(|a| a.id != id);
        agents.len() != before
    }

    // Tools

    pub async fn list_tools(&self) -> Vec<Tool> {
        self.tools.read().await.clone()
    }

    pub async fn get_tool(&self, id: &str) -> Option<Tool> {
        self.tools.read().await.iter().find(|t| t.id == id).cloned()
    }

    /// Tools enabled on `agent`, in collection order. Unknown ids are skipped.
    pub async fn enabled_tools(&self, agent: &Agent) -> Vec<Tool> {
        self.tools
            .read()
            .await
            .iter()
            .filter(|t| agent.has_tool(&t.id))
            .cloned()
            .collect()
    }

    fn check_tool(tool: &Tool) -> StoreResult<()> {
        require(&tool.name, "name")?;
        require(&tool.description, "description")
    }

    pub async fn create_tool(&self, mut tool: Tool) -> StoreResult<Tool> {
        Self::check_tool(&tool)?;
        ensure_id(&mut tool.id);

        let mut tools = self.tools.write().await;
        if tools.iter().any(|t| t.id == tool.id) {
            return Err(StoreError::Conflict {
                kind: "Tool",
                id: tool.id,
            });
        }
        tools.push(tool.clone());
        Ok(tool)
    }

    pub async fn update_tool(&self, id: &str, mut tool: Tool) -> StoreResult<Tool> {
        Self::check_tool(&tool)?;
        tool.id = id.to_string();

        let mut tools = self.tools.write().await;
        let existing = tools
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Tool",
                id: id.to_string(),
            })?;
        *existing = tool.clone();
        Ok(tool)
    }

    /// Remove a tool. Agents keep the dangling id; it is skipped when mapping.
    pub async fn delete_tool(&self, id: &str) -> bool {
        let mut tools = self.tools.write().await;
        let before = tools.len();
        tools.retain(|t| t.id != id);
        tools.len() != before
    }

    // Connections

    pub async fn list_connections(&self) -> Vec<Connection> {
        self.connections.read().await.clone()
    }

    pub async fn get_connection(&self, id: &str) -> Option<Connection> {
        self.connections
            .read()
            .await
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }

    /// Create a connection; status is always `connected` on create
    pub async fn create_connection(&self, mut connection: Connection) -> StoreResult<Connection> {
        require(&connection.name, "name")?;
        ensure_id(&mut connection.id);
        connection.status = ConnectionStatus::Connected;

        let mut connections = self.connections.write().await;
        if connections.iter().any(|c| c.id == connection.id) {
            return Err(StoreError::Conflict {
                kind: "Connection",
                id: connection.id,
            });
        }
        connections.push(connection.clone());
        Ok(connection)
    }

    /// Replace name, type and config; the stored status is kept
    pub async fn update_connection(&self, id: &str, mut connection: Connection) -> StoreResult<Connection> {
        require(&connection.name, "name")?;

        let mut connections = self.connections.write().await;
        let existing = connections
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "Connection",
                id: id.to_string(),
            })?;
        connection.id = id.to_string();
        connection.status = existing.status;
        *existing = connection.clone();
        Ok(connection)
    }

    pub async fn delete_connection(&self, id: &str) -> bool {
        let mut connections = self.connections.write().await;
        let before = connections.len();
        connections.retain(|c| c.id != id);
        connections.len() != before
    }
}

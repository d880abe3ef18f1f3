//! REST API handlers for the Web UI
//!
//! CRUD endpoints for agents, tools and connections, the sandbox chat and the
//! write-only secrets store.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

use crate::adapters::secrets::SharedSecretsStore;
use crate::adapters::workspace_store::{SharedWorkspaceStore, StoreError};
use crate::agents::error::AgentError;
use crate::agents::sandbox::{SandboxController, SessionSnapshot};
use crate::domain::{model_options, Agent, Connection, Message, ModelOption, Tool};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub store: SharedWorkspaceStore,
    pub sandbox: Arc<SandboxController>,
    pub secrets: SharedSecretsStore,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

type ApiReply<T> = (StatusCode, Json<ApiResponse<T>>);

fn store_failure<T>(err: StoreError) -> ApiReply<T> {
    let status = match &err {
        StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Conflict { .. } => StatusCode::CONFLICT,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

fn agent_failure<T>(err: AgentError) -> ApiReply<T> {
    let status = match &err {
        AgentError::NotFound(_) | AgentError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        AgentError::Busy(_) => StatusCode::CONFLICT,
        AgentError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        AgentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiResponse::error(err.to_string())))
}

fn not_found<T>(what: &str) -> ApiReply<T> {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::error(format!("{} not found", what))),
    )
}

fn deleted(removed: bool, what: &str) -> ApiReply<()> {
    if removed {
        (StatusCode::OK, Json(ApiResponse::ok()))
    } else {
        not_found(what)
    }
}

// ============================================================================
// Overview
// ============================================================================

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub agents: usize,
    pub tools: usize,
    pub connections: usize,
    pub connected_connections: usize,
    pub sandbox_sessions: usize,
    pub sandbox_turns: u64,
    pub failed_turns: u64,
    /// Percentage of turns that got a model reply; 100 when no turns ran yet
    pub success_rate: f64,
    pub tokens_used: u64,
}

/// GET /api/overview - Dashboard figures
pub async fn get_overview(State(state): State<ApiState>) -> impl IntoResponse {
    let counts = state.store.counts().await;
    let stats = state.sandbox.stats().await;
    let success_rate = if stats.turns == 0 {
        100.0
    } else {
        (stats.turns - stats.failed_turns) as f64 * 100.0 / stats.turns as f64
    };

    let overview = Overview {
        agents: counts.agents,
        tools: counts.tools,
        connections: counts.connections,
        connected_connections: counts.connected,
        sandbox_sessions: stats.sessions,
        sandbox_turns: stats.turns,
        failed_turns: stats.failed_turns,
        success_rate,
        tokens_used: stats.tokens_used,
    };
    (StatusCode::OK, Json(ApiResponse::success(overview)))
}

/// GET /api/models - Selectable model engines
pub async fn list_models() -> impl IntoResponse {
    let models: Vec<ModelOption> = model_options();
    (StatusCode::OK, Json(ApiResponse::success(models)))
}

// ============================================================================
// Agent CRUD Endpoints
// ============================================================================

/// GET /api/agents - List all agents
pub async fn list_agents(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(state.store.list_agents().await)))
}

/// GET /api/agents/:id - Get a single agent
pub async fn get_agent(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.get_agent(&id).await {
        Some(agent) => (StatusCode::OK, Json(ApiResponse::success(agent))),
        None => not_found("Agent"),
    }
}

/// POST /api/agents - Create an agent, or replace the one with the same id
pub async fn save_agent(State(state): State<ApiState>, Json(agent): Json<Agent>) -> impl IntoResponse {
    match state.store.save_agent(agent).await {
        Ok((agent, true)) => {
            info!(agent_id = %agent.id, name = %agent.name, "Agent created");
            (StatusCode::CREATED, Json(ApiResponse::success(agent)))
        }
        Ok((agent, false)) => (StatusCode::OK, Json(ApiResponse::success(agent))),
        Err(e) => store_failure(e),
    }
}

/// PUT /api/agents/:id - Update an agent
pub async fn update_agent(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(agent): Json<Agent>,
) -> impl IntoResponse {
    match state.store.update_agent(&id, agent).await {
        Ok(agent) => (StatusCode::OK, Json(ApiResponse::success(agent))),
        Err(e) => store_failure(e),
    }
}

/// DELETE /api/agents/:id - Delete an agent
pub async fn delete_agent(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    deleted(state.store.delete_agent(&id).await, "Agent")
}

// ============================================================================
// Tool CRUD Endpoints
// ============================================================================

/// GET /api/tools - List all tools
pub async fn list_tools(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(state.store.list_tools().await)))
}

/// GET /api/tools/:id - Get a single tool
pub async fn get_tool(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.get_tool(&id).await {
        Some(tool) => (StatusCode::OK, Json(ApiResponse::success(tool))),
        None => not_found("Tool"),
    }
}

/// POST /api/tools - Create a new tool
pub async fn create_tool(State(state): State<ApiState>, Json(tool): Json<Tool>) -> impl IntoResponse {
    match state.store.create_tool(tool).await {
        Ok(tool) => (StatusCode::CREATED, Json(ApiResponse::success(tool))),
        Err(e) => store_failure(e),
    }
}

/// PUT /api/tools/:id - Update a tool
pub async fn update_tool(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(tool): Json<Tool>,
) -> impl IntoResponse {
    match state.store.update_tool(&id, tool).await {
        Ok(tool) => (StatusCode::OK, Json(ApiResponse::success(tool))),
        Err(e) => store_failure(e),
    }
}

/// DELETE /api/tools/:id - Delete a tool
pub async fn delete_tool(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    deleted(state.store.delete_tool(&id).await, "Tool")
}

// ============================================================================
// Connection CRUD Endpoints
// ============================================================================

/// GET /api/connections - List all connections
pub async fn list_connections(State(state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(state.store.list_connections().await)),
    )
}

/// GET /api/connections/:id - Get a single connection
pub async fn get_connection(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.store.get_connection(&id).await {
        Some(connection) => (StatusCode::OK, Json(ApiResponse::success(connection))),
        None => not_found("Connection"),
    }
}

/// POST /api/connections - Create a new connection
pub async fn create_connection(
    State(state): State<ApiState>,
    Json(connection): Json<Connection>,
) -> impl IntoResponse {
    match state.store.create_connection(connection).await {
        Ok(connection) => (StatusCode::CREATED, Json(ApiResponse::success(connection))),
        Err(e) => store_failure(e),
    }
}

/// PUT /api/connections/:id - Update a connection (status is kept)
pub async fn update_connection(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(connection): Json<Connection>,
) -> impl IntoResponse {
    match state.store.update_connection(&id, connection).await {
        Ok(connection) => (StatusCode::OK, Json(ApiResponse::success(connection))),
        Err(e) => store_failure(e),
    }
}

/// DELETE /api/connections/:id - Delete a connection
pub async fn delete_connection(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    deleted(state.store.delete_connection(&id).await, "Connection")
}

// ============================================================================
// Sandbox Endpoints
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub agent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectAgentRequest {
    pub agent_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// POST /api/sandbox/sessions - Open a chat session
pub async fn create_session(
    State(state): State<ApiState>,
    body: Option<Json<CreateSessionRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    match state.sandbox.create_session(request.agent_id).await {
        Ok(session) => (StatusCode::CREATED, Json(ApiResponse::success(session))),
        Err(e) => agent_failure(e),
    }
}

/// GET /api/sandbox/sessions - List sessions
pub async fn list_sessions(State(state): State<ApiState>) -> impl IntoResponse {
    let sessions: Vec<SessionSnapshot> = state.sandbox.list_sessions().await;
    (StatusCode::OK, Json(ApiResponse::success(sessions)))
}

/// GET /api/sandbox/sessions/:id - Get a session with its transcript
pub async fn get_session(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.sandbox.get_session(&id).await {
        Ok(session) => (StatusCode::OK, Json(ApiResponse::success(session))),
        Err(e) => agent_failure(e),
    }
}

/// DELETE /api/sandbox/sessions/:id - Close a session
pub async fn delete_session(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    deleted(state.sandbox.delete_session(&id).await, "Session")
}

/// PUT /api/sandbox/sessions/:id/agent - Switch the session's agent
pub async fn select_agent(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<SelectAgentRequest>,
) -> impl IntoResponse {
    match state.sandbox.select_agent(&id, &request.agent_id).await {
        Ok(session) => (StatusCode::OK, Json(ApiResponse::success(session))),
        Err(e) => agent_failure(e),
    }
}

/// POST /api/sandbox/sessions/:id/messages - Run one chat turn
///
/// The turn runs on its own task so a dropped client connection cannot leave
/// the session stuck in the sending state.
pub async fn send_message(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(request): Json<SendMessageRequest>,
) -> impl IntoResponse {
    let sandbox = state.sandbox.clone();
    let turn = tokio::spawn(async move { sandbox.send(&id, &request.content).await });

    match turn.await {
        Ok(Ok(reply)) => (StatusCode::OK, Json(ApiResponse::<Message>::success(reply))),
        Ok(Err(e)) => agent_failure(e),
        Err(e) => {
            error!(error = %e, "Sandbox turn task failed");
            agent_failure(AgentError::Internal(e.to_string()))
        }
    }
}

/// DELETE /api/sandbox/sessions/:id/messages - Clear the transcript
pub async fn clear_messages(State(state): State<ApiState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.sandbox.clear_history(&id).await {
        Ok(session) => (StatusCode::OK, Json(ApiResponse::success(session))),
        Err(e) => agent_failure(e),
    }
}

// ============================================================================
// Secrets Endpoints
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetSecretRequest {
    pub value: String,
}

/// GET /api/secrets - List configured secret keys (never values)
pub async fn list_secrets(State(state): State<ApiState>) -> impl IntoResponse {
    (StatusCode::OK, Json(ApiResponse::success(state.secrets.list_keys().await)))
}

/// POST /api/secrets/:key - Set a secret
pub async fn set_secret(
    State(state): State<ApiState>,
    Path(key): Path<String>,
    Json(request): Json<SetSecretRequest>,
) -> impl IntoResponse {
    if request.value.trim().is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::<()>::error("Secret value is required")),
        );
    }
    state.secrets.set(key.clone(), request.value).await;
    info!(key = %key, "Secret updated");
    (StatusCode::OK, Json(ApiResponse::ok()))
}

/// DELETE /api/secrets/:key - Delete a secret
pub async fn delete_secret(State(state): State<ApiState>, Path(key): Path<String>) -> impl IntoResponse {
    deleted(state.secrets.delete(&key).await, "Secret")
}

/// DELETE /api/secrets - Delete all secrets
pub async fn clear_secrets(State(state): State<ApiState>) -> impl IntoResponse {
    state.secrets.clear().await;
    (StatusCode::OK, Json(ApiResponse::ok()))
}

//! API client for the Hangar backend

use crate::types::*;
use gloo_net::http::{Request, Response};

const API_BASE: &str = "/api";

/// Fetch dashboard figures
pub async fn get_overview() -> Result<Overview, String> {
    let url = format!("{}/overview", API_BASE);
    fetch_json::<Overview>(&url).await
}

/// `/health` is outside `/api` and not enveloped
pub async fn get_health() -> Result<HealthStatus, String> {
    Request::get("/health")
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn list_models() -> Result<Vec<ModelOption>, String> {
    let url = format!("{}/models", API_BASE);
    fetch_json::<Vec<ModelOption>>(&url).await
}

// ============================================================================
// Agents
// ============================================================================

pub async fn list_agents() -> Result<Vec<Agent>, String> {
    let url = format!("{}/agents", API_BASE);
    fetch_json::<Vec<Agent>>(&url).await
}

pub async fn get_agent(id: &str) -> Result<Agent, String> {
    let url = format!("{}/agents/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<Agent>(&url).await
}

/// Create or replace; an empty id makes the server generate one
pub async fn save_agent(agent: &Agent) -> Result<Agent, String> {
    let url = format!("{}/agents", API_BASE);
    post_json::<Agent, Agent>(&url, agent).await
}

pub async fn delete_agent(id: &str) -> Result<(), String> {
    let url = format!("{}/agents/{}", API_BASE, urlencoding::encode(id));
    delete_request(&url).await
}

// ============================================================================
// Tools
// ============================================================================

pub async fn list_tools() -> Result<Vec<Tool>, String> {
    let url = format!("{}/tools", API_BASE);
    fetch_json::<Vec<Tool>>(&url).await
}

pub async fn get_tool(id: &str) -> Result<Tool, String> {
    let url = format!("{}/tools/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<Tool>(&url).await
}

pub async fn create_tool(tool: &Tool) -> Result<Tool, String> {
    let url = format!("{}/tools", API_BASE);
    post_json::<Tool, Tool>(&url, tool).await
}

pub async fn update_tool(id: &str, tool: &Tool) -> Result<Tool, String> {
    let url = format!("{}/tools/{}", API_BASE, urlencoding::encode(id));
    put_json::<Tool, Tool>(&url, tool).await
}

pub async fn delete_tool(id: &str) -> Result<(), String> {
    let url = format!("{}/tools/{}", API_BASE, urlencoding::encode(id));
    delete_request(&url).await
}

// ============================================================================
// Connections
// ============================================================================

pub async fn list_connections() -> Result<Vec<Connection>, String> {
    let url = format!("{}/connections", API_BASE);
    fetch_json::<Vec<Connection>>(&url).await
}

pub async fn get_connection(id: &str) -> Result<Connection, String> {
    let url = format!("{}/connections/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<Connection>(&url).await
}

pub async fn create_connection(connection: &Connection) -> Result<Connection, String> {
    let url = format!("{}/connections", API_BASE);
    post_json::<Connection, Connection>(&url, connection).await
}

pub async fn update_connection(id: &str, connection: &Connection) -> Result<Connection, String> {
    let url = format!("{}/connections/{}", API_BASE, urlencoding::encode(id));
    put_json::<Connection, Connection>(&url, connection).await
}

pub async fn delete_connection(id: &str) -> Result<(), String> {
    let url = format!("{}/connections/{}", API_BASE, urlencoding::encode(id));
    delete_request(&url).await
}

// ============================================================================
// Sandbox
// ============================================================================

pub async fn create_session(agent_id: Option<String>) -> Result<SessionSnapshot, String> {
    let url = format!("{}/sandbox/sessions", API_BASE);
    post_json::<CreateSessionRequest, SessionSnapshot>(&url, &CreateSessionRequest { agent_id }).await
}

pub async fn get_session(id: &str) -> Result<SessionSnapshot, String> {
    let url = format!("{}/sandbox/sessions/{}", API_BASE, urlencoding::encode(id));
    fetch_json::<SessionSnapshot>(&url).await
}

pub async fn delete_session(id: &str) -> Result<(), String> {
    let url = format!("{}/sandbox/sessions/{}", API_BASE, urlencoding::encode(id));
    delete_request(&url).await
}

pub async fn select_agent(session_id: &str, agent_id: &str) -> Result<SessionSnapshot, String> {
    let url = format!("{}/sandbox/sessions/{}/agent", API_BASE, urlencoding::encode(session_id));
    let request = SelectAgentRequest {
        agent_id: agent_id.to_string(),
    };
    put_json::<SelectAgentRequest, SessionSnapshot>(&url, &request).await
}

/// Runs one turn; resolves with the reply appended by the server
pub async fn send_message(session_id: &str, content: &str) -> Result<Message, String> {
    let url = format!("{}/sandbox/sessions/{}/messages", API_BASE, urlencoding::encode(session_id));
    let request = SendMessageRequest {
        content: content.to_string(),
    };
    post_json::<SendMessageRequest, Message>(&url, &request).await
}

pub async fn clear_messages(session_id: &str) -> Result<(), String> {
    let url = format!("{}/sandbox/sessions/{}/messages", API_BASE, urlencoding::encode(session_id));
    delete_request(&url).await
}

// ============================================================================
// Secrets
// ============================================================================

pub async fn list_secrets() -> Result<Vec<String>, String> {
    let url = format!("{}/secrets", API_BASE);
    fetch_json::<Vec<String>>(&url).await
}

pub async fn set_secret(key: &str, value: &str) -> Result<(), String> {
    let url = format!("{}/secrets/{}", API_BASE, urlencoding::encode(key));
    let request = SetSecretRequest {
        value: value.to_string(),
    };
    post_empty(&url, &request).await
}

pub async fn delete_secret(key: &str) -> Result<(), String> {
    let url = format!("{}/secrets/{}", API_BASE, urlencoding::encode(key));
    delete_request(&url).await
}

// ============================================================================
// Helper functions
// ============================================================================

async fn unwrap_envelope<R: serde::de::DeserializeOwned>(response: Response) -> Result<R, String> {
    let api_response: ApiResponse<R> = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    if api_response.success {
        api_response.data.ok_or_else(|| "No data in response".to_string())
    } else {
        Err(api_response.error.unwrap_or_else(|| "Unknown error".to_string()))
    }
}

async fn unwrap_empty(response: Response) -> Result<(), String> {
    let api_response: ApiResponse<serde_json::Value> = response
        .json()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))?;

    if api_response.success {
        Ok(())
    } else {
        Err(api_response.error.unwrap_or_else(|| "Unknown error".to_string()))
    }
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    unwrap_envelope(response).await
}

async fn post_json<T: serde::Serialize, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    unwrap_envelope(response).await
}

async fn put_json<T: serde::Serialize, R: serde::de::DeserializeOwned>(
    url: &str,
    body: &T,
) -> Result<R, String> {
    let response = Request::put(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    unwrap_envelope(response).await
}

async fn delete_request(url: &str) -> Result<(), String> {
    let response = Request::delete(url)
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    unwrap_empty(response).await
}

/// POST request that expects no data in response (just success/error)
async fn post_empty<T: serde::Serialize>(url: &str, body: &T) -> Result<(), String> {
    let response = Request::post(url)
        .json(body)
        .map_err(|e| format!("Failed to serialize body: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Request failed: {}", e))?;
    unwrap_empty(response).await
}

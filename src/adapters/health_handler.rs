use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::adapters::workspace_store::SharedWorkspaceStore;
use crate::agents::llm::CredentialProvider;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub checks: HealthChecks,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthChecks {
    pub credential: String,
    pub agents: usize,
}

pub struct HealthHandler {
    credentials: Arc<dyn CredentialProvider>,
    store: SharedWorkspaceStore,
    start_time: std::time::Instant,
}

impl HealthHandler {
    pub fn new(credentials: Arc<dyn CredentialProvider>, store: SharedWorkspaceStore) -> Self {
        Self {
            credentials,
            store,
            start_time: std::time::Instant::now(),
        }
    }

    async fn credential_configured(&self) -> bool {
        self.credentials
            .api_key()
            .await
            .map_or(false, |k| !k.trim().is_empty())
    }

    /// Basic health check - returns 200 if server is running
    pub async fn health(&self) -> impl IntoResponse {
        let status = HealthStatus {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            checks: HealthChecks {
                credential: if self.credential_configured().await {
                    "ok".to_string()
                } else {
                    "missing".to_string()
                },
                agents: self.store.counts().await.agents,
            },
        };

        (StatusCode::OK, Json(status))
    }

    /// Readiness check - 200 only when a model API key resolves
    pub async fn ready(&self) -> impl IntoResponse {
        if self.credential_configured().await {
            (StatusCode::OK, Json(serde_json::json!({
                "status": "ready",
                "message": "Server is ready to accept requests"
            })))
        } else {
            (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({
                "status": "not_ready",
                "message": "No Gemini API key configured"
            })))
        }
    }

    /// Liveness check - returns 200 if server is alive
    pub async fn live(&self) -> impl IntoResponse {
        (StatusCode::OK, Json(serde_json::json!({
            "status": "alive",
            "message": "Server is alive"
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::workspace_store::WorkspaceStore;
    use crate::agents::llm::StaticCredential;

    fn handler(key: Option<&str>) -> HealthHandler {
        HealthHandler::new(
            Arc::new(StaticCredential(key.map(String::from))),
            Arc::new(WorkspaceStore::new()),
        )
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = handler(None).health().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_requires_credential() {
        let response = handler(None).ready().await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = handler(Some("key")).ready().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_live_endpoint() {
        let response = handler(None).live().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

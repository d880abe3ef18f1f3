use super::common;

use common::mock_gemini::MockGemini;
use common::test_server::{seeded_settings, TestServer};

#[tokio::test]
async fn test_health_endpoint() {
    let gemini = MockGemini::start().await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].is_number());
    assert_eq!(body["checks"]["agents"], 2);
    assert_eq!(body["checks"]["credential"], "missing");
}

#[tokio::test]
async fn test_ready_follows_secrets_store() {
    let gemini = MockGemini::start().await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), 503);

    let response = client
        .post(server.url("/api/secrets/HANGAR_INTEGRATION_GEMINI_KEY"))
        .json(&serde_json::json!({"value": "test-key"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(server.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let keys: serde_json::Value = client
        .get(server.url("/api/secrets"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(keys["data"], serde_json::json!(["HANGAR_INTEGRATION_GEMINI_KEY"]));
}

#[tokio::test]
async fn test_live_and_metrics_endpoints() {
    let gemini = MockGemini::start().await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();

    let response = client.get(server.url("/health/live")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(server.url("/metrics")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains("hangar_sessions_active"));
}

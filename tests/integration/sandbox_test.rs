use super::common;

use axum::http::StatusCode;
use common::mock_gemini::{text_reply, MockGemini};
use common::test_server::{seeded_settings, TestServer};
use serde_json::{json, Value};

const KEY_NAME: &str = "HANGAR_INTEGRATION_GEMINI_KEY";

async fn set_key(client: &reqwest::Client, server: &TestServer, value: &str) {
    let response = client
        .post(server.url(&format!("/api/secrets/{}", KEY_NAME)))
        .json(&json!({"value": value}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

async fn open_session(client: &reqwest::Client, server: &TestServer, agent_id: &str) -> String {
    let body: Value = client
        .post(server.url("/api/sandbox/sessions"))
        .json(&json!({"agentId": agent_id}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn send(client: &reqwest::Client, server: &TestServer, session: &str, content: &str) -> (u16, Value) {
    let response = client
        .post(server.url(&format!("/api/sandbox/sessions/{}/messages", session)))
        .json(&json!({"content": content}))
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_turn_reaches_gemini_with_mapped_request() {
    let gemini = MockGemini::start().await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();
    set_key(&client, &server, "key-one").await;

    let session = open_session(&client, &server, "1").await;
    let (status, body) = send(&client, &server, &session, "Where is order 42?").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["role"], "model");
    assert_eq!(body["data"]["content"], "Hello from the mock");

    let calls = gemini.calls().await;
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert_eq!(call.path, "/v1beta/models/gemini-3-flash-preview:generateContent");
    assert_eq!(call.api_key.as_deref(), Some("key-one"));
    assert_eq!(call.body["contents"].as_array().unwrap().len(), 1);
    assert_eq!(call.body["contents"][0]["role"], "user");
    assert_eq!(call.body["contents"][0]["parts"][0]["text"], "Where is order 42?");
    assert_eq!(
        call.body["systemInstruction"]["parts"][0]["text"],
        "You are an elite customer support specialist."
    );
    let declarations = call.body["tools"][0]["functionDeclarations"].as_array().unwrap();
    assert_eq!(declarations.len(), 1);
    assert_eq!(declarations[0]["name"], "check_order_status");
    assert_eq!(declarations[0]["parameters"]["required"], json!(["order_id"]));

    let overview: Value = client
        .get(server.url("/api/overview"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(overview["data"]["sandboxTurns"], 1);
    assert_eq!(overview["data"]["tokensUsed"], 12);
}

#[tokio::test]
async fn test_history_and_key_rotation() {
    let gemini = MockGemini::start().await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();
    set_key(&client, &server, "key-one").await;

    let session = open_session(&client, &server, "2").await;
    send(&client, &server, &session, "first").await;

    set_key(&client, &server, "key-two").await;
    send(&client, &server, &session, "second").await;

    let calls = gemini.calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].api_key.as_deref(), Some("key-one"));
    assert_eq!(calls[1].api_key.as_deref(), Some("key-two"));
    assert_eq!(calls[1].path, "/v1beta/models/gemini-3-pro-preview:generateContent");

    let turns = calls[1].body["contents"].as_array().unwrap();
    let roles: Vec<&str> = turns.iter().map(|t| t["role"].as_str().unwrap()).collect();
    assert_eq!(roles, vec!["user", "model", "user"]);
    assert_eq!(
        calls[1].body["tools"][0]["functionDeclarations"].as_array().unwrap().len(),
        2
    );
}

#[tokio::test]
async fn test_provider_failure_records_system_message() {
    let gemini = MockGemini::start().await;
    gemini
        .respond_with(StatusCode::TOO_MANY_REQUESTS, json!({"error": {"message": "quota"}}))
        .await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();
    set_key(&client, &server, "key-one").await;

    let session = open_session(&client, &server, "1").await;
    let (status, body) = send(&client, &server, &session, "hello").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["role"], "system");
    assert_eq!(
        body["data"]["content"],
        "Error communicating with agent. Check API logs."
    );

    let snapshot: Value = client
        .get(server.url(&format!("/api/sandbox/sessions/{}", session)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let messages = snapshot["data"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(snapshot["data"]["state"], "idle");
}

#[tokio::test]
async fn test_missing_key_fails_the_turn_without_outbound_call() {
    let gemini = MockGemini::start().await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();

    let session = open_session(&client, &server, "1").await;
    let (_, body) = send(&client, &server, &session, "hello").await;
    assert_eq!(body["data"]["role"], "system");
    assert!(gemini.calls().await.is_empty());
}

#[tokio::test]
async fn test_empty_text_reply_uses_placeholder() {
    let gemini = MockGemini::start().await;
    gemini.respond_with(StatusCode::OK, text_reply("")).await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();
    set_key(&client, &server, "key-one").await;

    let session = open_session(&client, &server, "1").await;
    let (_, body) = send(&client, &server, &session, "hello").await;
    assert_eq!(body["data"]["content"], "Thinking...");
}

#[tokio::test]
async fn test_function_calls_are_returned_not_executed() {
    let gemini = MockGemini::start().await;
    gemini
        .respond_with(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [
                        {"functionCall": {"name": "check_order_status", "args": {"order_id": "42"}}}
                    ]}
                }]
            }),
        )
        .await;
    let server = TestServer::new(seeded_settings(&gemini.base_url)).await;
    let client = reqwest::Client::new();
    set_key(&client, &server, "key-one").await;

    let session = open_session(&client, &server, "1").await;
    let (_, body) = send(&client, &server, &session, "status of 42").await;
    assert_eq!(body["data"]["functionCalls"][0]["name"], "check_order_status");
    assert_eq!(body["data"]["functionCalls"][0]["args"]["order_id"], "42");
    assert_eq!(gemini.calls().await.len(), 1);
}

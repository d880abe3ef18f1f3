use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use hangar::config::Settings;
use hangar::domain::{Agent, Connection, ConnectionType, ParameterType, Tool, ToolParameter};
use serde_json::{json, Value};
use tower::util::ServiceExt;

fn test_app() -> Router {
    let mut settings = Settings::default();
    // Unreachable on purpose; these tests never complete a turn
    settings.gemini.base_url = "http://127.0.0.1:9/v1beta".to_string();
    settings.gemini.api_key_env = "HANGAR_API_TEST_UNSET_KEY".to_string();

    let mut agent = Agent::new("1", "Customer Support Lead");
    agent.tools = vec!["t1".to_string()];
    settings.agents = vec![agent];
    settings.tools = vec![Tool::new("t1", "check_order_status", "Retrieve tracking details.")
        .with_parameter(ToolParameter::new("order_id", ParameterType::String, "Order id", true))];
    settings.connections = vec![Connection::new("c1", "PostgreSQL Production", ConnectionType::Database)];

    hangar::create_app(hangar::build_context(&settings).unwrap())
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().uri(uri).method(method);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_agents_crud() {
    let app = test_app();

    let (status, body) = call(&app, "GET", "/api/agents", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // Create without id or model
    let (status, body) = call(
        &app,
        "POST",
        "/api/agents",
        Some(json!({
            "name": "Researcher",
            "role": "Finds sources",
            "systemInstruction": "Cite everything.",
            "tools": ["t1"],
            "type": "super"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body["data"]["model"], "gemini-3-flash-preview");
    assert_eq!(body["data"]["type"], "super");

    // Saving again with the same id replaces in place
    let (status, body) = call(
        &app,
        "POST",
        "/api/agents",
        Some(json!({"id": id, "name": "Researcher v2", "model": "gemini-3-pro-preview"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Researcher v2");

    let (_, body) = call(&app, "GET", "/api/agents", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/agents/{}", id),
        Some(json!({"name": "Researcher v3"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, body) = call(&app, "GET", &format!("/api/agents/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Researcher v3");

    let (status, _) = call(&app, "DELETE", &format!("/api/agents/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = call(&app, "GET", &format!("/api/agents/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_blank_agent_name_is_rejected() {
    let app = test_app();

    let (status, body) = call(&app, "POST", "/api/agents", Some(json!({"name": "   "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());

    let (_, body) = call(&app, "GET", "/api/agents", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_tools_crud() {
    let app = test_app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/tools",
        Some(json!({
            "name": "update_crm_lead",
            "description": "Update lead status.",
            "connectionId": "c1",
            "parameters": [
                {"name": "email", "type": "string", "description": "Email", "required": true},
                {"name": "score", "type": "number", "description": "Score", "required": false}
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["parameters"][1]["type"], "number");
    assert_eq!(body["data"]["connectionId"], "c1");

    // Duplicate id
    let (status, _) = call(
        &app,
        "POST",
        "/api/tools",
        Some(json!({"id": "t1", "name": "dup", "description": "dup"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Missing description
    let (status, _) = call(&app, "POST", "/api/tools", Some(json!({"name": "bare"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/tools/{}", id),
        Some(json!({"name": "update_crm_lead", "description": "Changed."})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], "Changed.");

    let (status, _) = call(&app, "DELETE", &format!("/api/tools/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "DELETE", &format!("/api/tools/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_connections_are_created_connected() {
    let app = test_app();

    let (status, body) = call(
        &app,
        "POST",
        "/api/connections",
        Some(json!({
            "name": "Order Webhook",
            "type": "WEBHOOK",
            "status": "error",
            "config": {"url": "https://hooks.example.com/orders"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "connected");
    assert_eq!(body["data"]["config"]["url"], "https://hooks.example.com/orders");
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        &app,
        "PUT",
        &format!("/api/connections/{}", id),
        Some(json!({"name": "Order Webhook v2", "type": "WEBHOOK", "status": "pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Order Webhook v2");
    assert_eq!(body["data"]["status"], "connected");

    let (_, body) = call(&app, "GET", "/api/overview", None).await;
    assert_eq!(body["data"]["connections"], 2);
    assert_eq!(body["data"]["connectedConnections"], 2);
}

#[tokio::test]
async fn test_overview_and_models() {
    let app = test_app();

    let (status, body) = call(&app, "GET", "/api/overview", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["agents"], 1);
    assert_eq!(body["data"]["tools"], 1);
    assert_eq!(body["data"]["sandboxTurns"], 0);
    assert_eq!(body["data"]["successRate"], 100.0);

    let (status, body) = call(&app, "GET", "/api/models", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["gemini-3-flash-preview", "gemini-3-pro-preview", "gemini-2.5-flash-lite-latest"]
    );
}

#[tokio::test]
async fn test_sandbox_rejections() {
    let app = test_app();

    // No body: defaults to the first agent
    let (status, body) = call(&app, "POST", "/api/sandbox/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["agentId"], "1");
    assert_eq!(body["data"]["state"], "idle");
    let session = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/sandbox/sessions/{}/messages", session),
        Some(json!({"content": "   "})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = call(
        &app,
        "POST",
        "/api/sandbox/sessions/nope/messages",
        Some(json!({"content": "hi"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "PUT",
        &format!("/api/sandbox/sessions/{}/agent", session),
        Some(json!({"agentId": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(
        &app,
        "POST",
        "/api/sandbox/sessions",
        Some(json!({"agentId": "missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, "GET", &format!("/api/sandbox/sessions/{}", session), None).await;
    assert!(body["data"]["messages"].as_array().unwrap().is_empty());

    let (status, _) = call(&app, "DELETE", &format!("/api/sandbox/sessions/{}/messages", session), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "DELETE", &format!("/api/sandbox/sessions/{}", session), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call(&app, "GET", &format!("/api/sandbox/sessions/{}", session), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_secrets_never_expose_values() {
    let app = test_app();

    let (status, _) = call(
        &app,
        "POST",
        "/api/secrets/GEMINI_API_KEY",
        Some(json!({"value": "super-secret"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, "POST", "/api/secrets/OTHER", Some(json!({"value": " "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = call(&app, "GET", "/api/secrets", None).await;
    assert_eq!(body["data"], json!(["GEMINI_API_KEY"]));
    assert!(!body.to_string().contains("super-secret"));

    let (status, _) = call(&app, "DELETE", "/api/secrets/GEMINI_API_KEY", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = call(&app, "GET", "/api/secrets", None).await;
    assert_eq!(body["data"], json!([]));
}


#[tokio::test]
async fn test_closed_sessions_leave_the_overview() {
    let app = test_app();

    // Each sandbox visit opens a session and closes it on the way out
    for _ in 0..2 {
        let (status, body) = call(&app, "POST", "/api/sandbox/sessions", Some(json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        let session = body["data"]["id"].as_str().unwrap().to_string();

        let (_, body) = call(&app, "GET", "/api/overview", None).await;
        assert_eq!(body["data"]["sandboxSessions"], 1);

        let (status, _) = call(&app, "DELETE", &format!("/api/sandbox/sessions/{}", session), None).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = call(&app, "GET", "/api/overview", None).await;
    assert_eq!(body["data"]["sandboxSessions"], 0);
    let (_, body) = call(&app, "GET", "/api/sandbox/sessions", None).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode, Uri},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One request as seen by the fake Gemini endpoint
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub api_key: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<RecordedCall>>,
    reply: Mutex<Option<(StatusCode, Value)>>,
}

/// In-process stand-in for `generateContent`
#[derive(Clone)]
pub struct MockGemini {
    state: Arc<MockState>,
    pub base_url: String,
}

pub fn text_reply(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 8, "candidatesTokenCount": 4, "totalTokenCount": 12}
    })
}

async fn record(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.calls.lock().await.push(RecordedCall {
        path: uri.path().to_string(),
        api_key: headers
            .get("x-goog-api-key")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
        body,
    });

    let reply = state.reply.lock().await.clone();
    match reply {
        Some((status, body)) => (status, Json(body)),
        None => (StatusCode::OK, Json(text_reply("Hello from the mock"))),
    }
}

impl MockGemini {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            state,
            base_url: format!("http://{}/v1beta", addr),
        }
    }

    pub async fn respond_with(&self, status: StatusCode, body: Value) {
        *self.state.reply.lock().await = Some((status, body));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().await.clone()
    }
}

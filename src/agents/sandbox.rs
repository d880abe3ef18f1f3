//! Sandbox controller
//!
//! Each session holds an append-only transcript, the selected agent and a
//! send state. At most one turn is in flight per session: the `Sending` flag
//! is checked and set under the session mutex, and the mutex is released
//! while the model call runs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use super::error::{AgentError, AgentResult};
use super::llm::LlmProvider;
use super::mapper::run_agent;
use crate::adapters::metrics_handler::MetricsCollector;
use crate::adapters::workspace_store::SharedWorkspaceStore;
use crate::domain::{new_id, Message};

/// Shown when the model returns no text
pub const EMPTY_REPLY_PLACEHOLDER: &str = "Thinking...";

/// Appended as a system message when a turn fails
pub const TURN_FAILED_MESSAGE: &str = "Error communicating with agent. Check API logs.";

pub const DEFAULT_HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Sending,
}

#[derive(Debug)]
struct Session {
    id: String,
    agent_id: Option<String>,
    messages: Vec<Message>,
    state: SessionState,
    created_at: DateTime<Utc>,
}

impl Session {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id.clone(),
            agent_id: self.agent_id.clone(),
            state: self.state,
            messages: self.messages.clone(),
            created_at: self.created_at,
        }
    }
}

/// Read-only copy of a session for API responses
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub agent_id: Option<String>,
    pub state: SessionState,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

/// Running totals across all sessions
#[derive(Debug, Default)]
struct TurnStats {
    succeeded: AtomicU64,
    failed: AtomicU64,
    tokens: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SandboxStats {
    pub sessions: usize,
    pub turns: u64,
    pub failed_turns: u64,
    pub tokens_used: u64,
}

pub struct SandboxController {
    store: SharedWorkspaceStore,
    provider: Arc<dyn LlmProvider>,
    sessions: RwLock<HashMap<String, Arc<Mutex<Session>>>>,
    history_window: usize,
    stats: TurnStats,
    metrics: Option<Arc<MetricsCollector>>,
}

impl SandboxController {
    pub fn new(store: SharedWorkspaceStore, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            store,
            provider,
            sessions: RwLock::new(HashMap::new()),
            history_window: DEFAULT_HISTORY_WINDOW,
            stats: TurnStats::default(),
            metrics: None,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsCollector>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    async fn session(&self, session_id: &str) -> AgentResult<Arc<Mutex<Session>>> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| AgentError::SessionNotFound(session_id.to_string()))
    }

    async fn require_agent(&self, agent_id: &str) -> AgentResult<()> {
        match self.store.get_agent(agent_id).await {
            Some(_) => Ok(()),
            None => Err(AgentError::NotFound(agent_id.to_string())),
        }
    }

    fn update_session_gauge(&self, count: usize) {
        if let Some(metrics) = &self.metrics {
            metrics.sessions_active.set(count as i64);
        }
    }

    /// Open a session on `agent_id`, or on the first agent when none is given
    pub async fn create_session(&self, agent_id: Option<String>) -> AgentResult<SessionSnapshot> {
        let agent_id = match agent_id.filter(|id| !id.trim().is_empty()) {
            Some(id) => {
                self.require_agent(&id).await?;
                Some(id)
            }
            None => self.store.first_agent().await.map(|a| a.id),
        };

        let session = Session {
            id: new_id(),
            agent_id,
            messages: Vec::new(),
            state: SessionState::Idle,
            created_at: Utc::now(),
        };
        let snapshot = session.snapshot();

        let mut sessions = self.sessions.write().await;
        sessions.insert(snapshot.id.clone(), Arc::new(Mutex::new(session)));
        self.update_session_gauge(sessions.len());
        info!(session_id = %snapshot.id, agent_id = ?snapshot.agent_id, "Sandbox session created");
        Ok(snapshot)
    }

    pub async fn list_sessions(&self) -> Vec<SessionSnapshot> {
        let handles: Vec<_> = self.sessions.read().await.values().cloned().collect();
        let mut snapshots = Vec::with_capacity(handles.len());
        for handle in handles {
            snapshots.push(handle.lock().await.snapshot());
        }
        snapshots.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        snapshots
    }

    pub async fn get_session(&self, session_id: &str) -> AgentResult<SessionSnapshot> {
        Ok(self.session(session_id).await?.lock().await.snapshot())
    }

    pub async fn delete_session(&self, session_id: &str) -> bool {
        let mut sessions = self.sessions.write().await;
        let removed = sessions.remove(session_id).is_some();
        self.update_session_gauge(sessions.len());
        removed
    }

    /// Switch the session's agent. History is kept.
    pub async fn select_agent(&self, session_id: &str, agent_id: &str) -> AgentResult<SessionSnapshot> {
        self.require_agent(agent_id).await?;
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        session.agent_id = Some(agent_id.to_string());
        Ok(session.snapshot())
    }

    /// Drop the transcript. Refused while a turn is in flight.
    pub async fn clear_history(&self, session_id: &str) -> AgentResult<SessionSnapshot> {
        let handle = self.session(session_id).await?;
        let mut session = handle.lock().await;
        if session.state == SessionState::Sending {
            return Err(AgentError::Busy(session_id.to_string()));
        }
        session.messages.clear();
        Ok(session.snapshot())
    }

    pub async fn stats(&self) -> SandboxStats {
        let succeeded = self.stats.succeeded.load(Ordering::Relaxed);
        let failed = self.stats.failed.load(Ordering::Relaxed);
        SandboxStats {
            sessions: self.sessions.read().await.len(),
            turns: succeeded + failed,
            failed_turns: failed,
            tokens_used: self.stats.tokens.load(Ordering::Relaxed),
        }
    }

    /// Run one chat turn and return the message appended for the reply.
    ///
    /// Rejections (blank input, busy session, missing session or agent) leave
    /// the transcript untouched and make no outbound call. A failed model call
    /// is not an error here: it appends one system message and returns it.
    pub async fn send(&self, session_id: &str, input: &str) -> AgentResult<Message> {
        if input.trim().is_empty() {
            warn!(session_id, "Rejected blank sandbox input");
            return Err(AgentError::Validation("message content is required".to_string()));
        }

        let handle = self.session(session_id).await?;
        let (agent, history) = {
            let mut session = handle.lock().await;
            if session.state == SessionState::Sending {
                warn!(session_id, "Rejected send while a turn is in flight");
                return Err(AgentError::Busy(session_id.to_string()));
            }
            let agent_id = session
                .agent_id
                .clone()
                .ok_or_else(|| AgentError::NotFound("no agent selected".to_string()))?;
            let agent = self
                .store
                .get_agent(&agent_id)
                .await
                .ok_or_else(|| AgentError::NotFound(agent_id.clone()))?;

            let start = session.messages.len().saturating_sub(self.history_window);
            let history = session.messages[start..].to_vec();
            session.messages.push(Message::user(input));
            session.state = SessionState::Sending;
            (agent, history)
        };

        let tools = self.store.enabled_tools(&agent).await;
        let started = Instant::now();
        let result = run_agent(self.provider.as_ref(), &agent, &tools, input, &history).await;
        let elapsed = started.elapsed().as_secs_f64();

        let reply = match result {
            Ok(response) => {
                self.stats.succeeded.fetch_add(1, Ordering::Relaxed);
                if let Some(usage) = &response.usage_metadata {
                    self.stats
                        .tokens
                        .fetch_add(usage.total_tokens(), Ordering::Relaxed);
                    if let Some(metrics) = &self.metrics {
                        metrics.record_usage(usage);
                    }
                }
                if let Some(metrics) = &self.metrics {
                    metrics.llm_request_duration.observe(elapsed);
                    metrics.sandbox_turns.with_label_values(&["success"]).inc();
                }

                let text = response.text();
                let text = if text.is_empty() {
                    EMPTY_REPLY_PLACEHOLDER.to_string()
                } else {
                    text
                };
                Message::model_with_calls(text, response.function_calls())
            }
            Err(_) => {
                self.stats.failed.fetch_add(1, Ordering::Relaxed);
                if let Some(metrics) = &self.metrics {
                    metrics.llm_request_duration.observe(elapsed);
                    metrics.sandbox_turns.with_label_values(&["error"]).inc();
                }
                Message::system(TURN_FAILED_MESSAGE)
            }
        };

        let mut session = handle.lock().await;
        session.messages.push(reply.clone());
        session.state = SessionState::Idle;
        Ok(reply)
    }
}

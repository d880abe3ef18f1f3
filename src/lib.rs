//! # Hangar - AI agent control plane
//!
//! Hangar keeps a workspace of agents, tools and connections in memory and
//! lets operators try agents in a chat sandbox backed by the Gemini
//! `generateContent` API.
//!
//! ## Features
//!
//! - **Workspace CRUD**: agents, typed tools and placeholder connections
//! - **Sandbox**: one turn in flight per session, bounded history window
//! - **Request mapping**: tool schemas become Gemini function declarations
//! - **Metrics**: Prometheus metrics for turns, latency and token usage
//! - **Health Checks**: readiness tracks whether an API key resolves
//! - **Embedded UI**: Leptos single-page app served from the binary
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hangar::config::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::from_root(".")?;
//!     let _app = hangar::create_app(hangar::build_context(&settings)?);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use crate::adapters::metrics_handler::{MetricsCollector, MetricsHandler};
use crate::adapters::secrets::{create_secrets_store, SecretsCredentials};
use crate::adapters::workspace_store::WorkspaceStore;
use crate::agents::llm::{CredentialProvider, GeminiProvider};
use crate::agents::sandbox::SandboxController;
use crate::config::Settings;
use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Everything the router needs, wired from settings
pub struct AppContext {
    pub api_state: ApiState,
    pub health_handler: Arc<HealthHandler>,
    pub metrics_handler: Arc<MetricsHandler>,
}

/// Wire the store, provider, sandbox and handlers from validated settings
pub fn build_context(settings: &Settings) -> anyhow::Result<AppContext> {
    let store = Arc::new(WorkspaceStore::seeded(
        settings.agents.clone(),
        settings.tools.clone(),
        settings.connections.clone(),
    ));
    let secrets = create_secrets_store();
    let credentials: Arc<dyn CredentialProvider> = Arc::new(SecretsCredentials::new(
        secrets.clone(),
        settings.gemini.api_key_env.clone(),
    ));

    let provider = GeminiProvider::new(settings.gemini.base_url.clone(), credentials.clone())
        .with_timeout(settings.gemini.timeout());

    let collector = Arc::new(MetricsCollector::new()?);
    let sandbox = SandboxController::new(store.clone(), Arc::new(provider))
        .with_history_window(settings.sandbox.history_window)
        .with_metrics(collector.clone());

    Ok(AppContext {
        api_state: ApiState {
            store: store.clone(),
            sandbox: Arc::new(sandbox),
            secrets,
        },
        health_handler: Arc::new(HealthHandler::new(credentials, store)),
        metrics_handler: Arc::new(MetricsHandler::new(collector)),
    })
}

/// Creates the Axum application router with all endpoints configured.
pub fn create_app(context: AppContext) -> Router {
    let AppContext {
        api_state,
        health_handler,
        metrics_handler,
    } = context;

    let ops_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/ready", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.ready().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler;
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }))
        .route("/metrics", get({
            let handler = metrics_handler;
            move || {
                let h = handler.clone();
                async move { h.metrics().await }
            }
        }));

    // API routes for Web UI
    let api_router = Router::new()
        .route("/overview", get(api_handler::get_overview))
        .route("/models", get(api_handler::list_models))
        // Agents CRUD
        .route("/agents", get(api_handler::list_agents).post(api_handler::save_agent))
        .route("/agents/:id", get(api_handler::get_agent).put(api_handler::update_agent).delete(api_handler::delete_agent))
        // Tools CRUD
        .route("/tools", get(api_handler::list_tools).post(api_handler::create_tool))
        .route("/tools/:id", get(api_handler::get_tool).put(api_handler::update_tool).delete(api_handler::delete_tool))
        // Connections CRUD
        .route("/connections", get(api_handler::list_connections).post(api_handler::create_connection))
        .route("/connections/:id", get(api_handler::get_connection).put(api_handler::update_connection).delete(api_handler::delete_connection))
        // Sandbox
        .route("/sandbox/sessions", get(api_handler::list_sessions).post(api_handler::create_session))
        .route("/sandbox/sessions/:id", get(api_handler::get_session).delete(api_handler::delete_session))
        .route("/sandbox/sessions/:id/agent", put(api_handler::select_agent))
        .route("/sandbox/sessions/:id/messages", post(api_handler::send_message).delete(api_handler::clear_messages))
        // Secrets (write-only)
        .route("/secrets", get(api_handler::list_secrets).delete(api_handler::clear_secrets))
        .route("/secrets/:key", post(api_handler::set_secret).delete(api_handler::delete_secret))
        .with_state(api_state);

    ops_router
        .nest("/api", api_router)
        // UI endpoint (catch-all for SPA)
        .fallback(crate::adapters::ui_handler::UIHandler::serve)
        .layer(TraceLayer::new_for_http())
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}

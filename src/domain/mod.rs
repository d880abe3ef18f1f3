//! Domain types for the Hangar control plane
//!
//! Shared data shapes for agents, tools, connections and chat messages.
//! Wire names are camelCase so the UI and the REST API agree on one shape.

mod agent;
mod connection;
mod message;
mod tool;

pub use agent::*;
pub use connection::*;
pub use message::*;
pub use tool::*;

/// Model used when an agent does not name one
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Generate a fresh collision-resistant identifier
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A selectable model engine shown in the agent builder
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct ModelOption {
    pub id: String,
    pub label: String,
}

/// Model engines offered by the agent builder
pub fn model_options() -> Vec<ModelOption> {
    [
        ("gemini-3-flash-preview", "Gemini 3 Flash (Fast)"),
        ("gemini-3-pro-preview", "Gemini 3 Pro (Smart)"),
        ("gemini-2.5-flash-lite-latest", "Gemini 2.5 Flash Lite"),
    ]
    .into_iter()
    .map(|(id, label)| ModelOption {
        id: id.to_string(),
        label: label.to_string(),
    })
    .collect()
}

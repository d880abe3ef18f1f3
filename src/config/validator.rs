use std::collections::{HashMap, HashSet};
use thiserror::Error;

use crate::config::{GeminiSettings, SandboxSettings, ServerSettings, Settings};
use crate::domain::{Agent, Connection, Tool};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Cross-reference error: {0}")]
    CrossReference(String),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

type ValidationResult = Result<(), Vec<ValidationError>>;

fn finish(errors: Vec<ValidationError>) -> ValidationResult {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicate_ids<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (idx, id) in ids.enumerate() {
        if let Some(prev_idx) = seen.insert(id, idx) {
            errors.push(ValidationError::Duplicate(format!(
                "{} id '{}' appears at indices {} and {}",
                kind, id, prev_idx, idx
            )));
        }
    }
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> ValidationResult {
        let mut errors = Vec::new();

        for result in [
            Self::validate_server(&settings.server),
            Self::validate_gemini(&settings.gemini),
            Self::validate_sandbox(&settings.sandbox),
            Self::validate_agents(&settings.agents),
            Self::validate_tools(&settings.tools),
            Self::validate_connections(&settings.connections),
            Self::validate_cross_references(settings),
        ] {
            if let Err(e) = result {
                errors.extend(e);
            }
        }

        finish(errors)
    }

    fn validate_server(server: &ServerSettings) -> ValidationResult {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        finish(errors)
    }

    fn validate_gemini(gemini: &GeminiSettings) -> ValidationResult {
        let mut errors = Vec::new();

        if gemini.base_url.trim().is_empty() {
            errors.push(ValidationError::MissingField("gemini.base_url".to_string()));
        } else if !gemini.base_url.starts_with("http://") && !gemini.base_url.starts_with("https://") {
            errors.push(ValidationError::InvalidValue {
                field: "gemini.base_url".to_string(),
                reason: "Must be an http(s) URL".to_string(),
            });
        }

        if gemini.api_key_env.trim().is_empty() {
            errors.push(ValidationError::MissingField("gemini.api_key_env".to_string()));
        }

        if gemini.default_model.trim().is_empty() {
            errors.push(ValidationError::MissingField("gemini.default_model".to_string()));
        }

        if gemini.timeout_seconds == Some(0) {
            errors.push(ValidationError::InvalidValue {
                field: "gemini.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0 when set".to_string(),
            });
        }

        finish(errors)
    }

    fn validate_sandbox(sandbox: &SandboxSettings) -> ValidationResult {
        if sandbox.history_window == 0 {
            return Err(vec![ValidationError::InvalidValue {
                field: "sandbox.history_window".to_string(),
                reason: "History window must be greater than 0".to_string(),
            }]);
        }
        Ok(())
    }

    fn validate_agents(agents: &[Agent]) -> ValidationResult {
        let mut errors = Vec::new();
        check_duplicate_ids("Agent", agents.iter().map(|a| a.id.as_str()), &mut errors);

        for (idx, agent) in agents.iter().enumerate() {
            if agent.name.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("agents[{}].name", idx)));
            }
        }

        finish(errors)
    }

    fn validate_tools(tools: &[Tool]) -> ValidationResult {
        let mut errors = Vec::new();
        check_duplicate_ids("Tool", tools.iter().map(|t| t.id.as_str()), &mut errors);

        for (idx, tool) in tools.iter().enumerate() {
            if tool.name.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!("tools[{}].name", idx)));
            }
            if tool.description.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "tools[{}].description",
                    idx
                )));
            }
        }

        finish(errors)
    }

    fn validate_connections(connections: &[Connection]) -> ValidationResult {
        let mut errors = Vec::new();
        check_duplicate_ids(
            "Connection",
            connections.iter().map(|c| c.id.as_str()),
            &mut errors,
        );

        for (idx, connection) in connections.iter().enumerate() {
            if connection.name.trim().is_empty() {
                errors.push(ValidationError::MissingField(format!(
                    "connections[{}].name",
                    idx
                )));
            }
        }

        finish(errors)
    }

    /// Seeded references must resolve; runtime edits are not checked
    fn validate_cross_references(settings: &Settings) -> ValidationResult {
        let mut errors = Vec::new();
        let tool_ids: HashSet<&str> = settings.tools.iter().map(|t| t.id.as_str()).collect();
        let connection_ids: HashSet<&str> =
            settings.connections.iter().map(|c| c.id.as_str()).collect();

        for agent in &settings.agents {
            for tool_id in &agent.tools {
                if !tool_ids.contains(tool_id.as_str()) {
                    errors.push(ValidationError::CrossReference(format!(
                        "Agent '{}' references unknown tool '{}'",
                        agent.name, tool_id
                    )));
                }
            }
        }

        for tool in &settings.tools {
            if let Some(connection_id) = &tool.connection_id {
                if !connection_ids.contains(connection_id.as_str()) {
                    errors.push(ValidationError::CrossReference(format!(
                        "Tool '{}' references unknown connection '{}'",
                        tool.name, connection_id
                    )));
                }
            }
        }

        finish(errors)
    }
}

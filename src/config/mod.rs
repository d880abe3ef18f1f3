use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub mod validator;

use crate::agents::llm::DEFAULT_BASE_URL;
use crate::agents::sandbox::DEFAULT_HISTORY_WINDOW;
use crate::cli::Cli;
use crate::domain::{new_id, Agent, Connection, Tool, DEFAULT_MODEL};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub sandbox: SandboxSettings,
    /// Seed agents loaded at startup
    #[serde(default)]
    pub agents: Vec<Agent>,
    #[serde(default)]
    pub tools: Vec<Tool>,
    #[serde(default)]
    pub connections: Vec<Connection>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GeminiSettings {
    pub base_url: String,
    /// Secret key / environment variable holding the API key
    pub api_key_env: String,
    pub default_model: String,
    /// No timeout when unset
    pub timeout_seconds: Option<u64>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key_env: crate::adapters::secrets::keys::GEMINI_API_KEY.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout_seconds: None,
        }
    }
}

impl GeminiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SandboxSettings {
    /// Prior messages sent with each turn
    pub history_window: usize,
}

impl Default for SandboxSettings {
    fn default() -> Self {
        Self {
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            gemini: GeminiSettings::default(),
            sandbox: SandboxSettings::default(),
            agents: Vec::new(),
            tools: Vec::new(),
            connections: Vec::new(),
        }
    }
}

fn validation_failure(errors: Vec<validator::ValidationError>) -> anyhow::Error {
    let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    anyhow::anyhow!(
        "Configuration validation failed:\n{}",
        error_messages.join("\n")
    )
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root = cli
            .config
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut settings = Self::build(Some(&cli.config))?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.load_external_configs(root)?;
        settings.normalize();

        validator::ConfigValidator::validate(&settings).map_err(validation_failure)?;

        Ok(settings)
    }

    /// Load `<root>/hangar.{toml,yaml,json}` and `<root>/config/*` without CLI overrides
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let root = root.as_ref();
        let mut settings = Self::build(Some(&root.join("hangar")))?;

        settings.load_external_configs(root)?;
        settings.normalize();

        validator::ConfigValidator::validate(&settings).map_err(validation_failure)?;

        Ok(settings)
    }

    fn build(config_path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        let s = builder
            .add_source(Environment::with_prefix("HANGAR").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }

    /// Apply CLI argument overrides to settings
    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(base_url) = &cli.gemini_base_url {
            self.gemini.base_url = base_url.clone();
        }
        if let Some(api_key_env) = &cli.api_key_env {
            self.gemini.api_key_env = api_key_env.clone();
        }
    }

    fn load_external_configs(&mut self, root: &Path) -> Result<(), anyhow::Error> {
        let dir = root.join("config");
        let agents = load_dir::<Agent>(&dir.join("agents"))?;
        let tools = load_dir::<Tool>(&dir.join("tools"))?;
        let connections = load_dir::<Connection>(&dir.join("connections"))?;

        Self::merge_vec_by_key(&mut self.agents, agents, |a| a.id.clone());
        Self::merge_vec_by_key(&mut self.tools, tools, |t| t.id.clone());
        Self::merge_vec_by_key(&mut self.connections, connections, |c| c.id.clone());
        Ok(())
    }

    /// Fill generated ids and default models on seed entries
    fn normalize(&mut self) {
        for agent in &mut self.agents {
            if agent.id.trim().is_empty() {
                agent.id = new_id();
            }
            if agent.model.trim().is_empty() {
                agent.model = self.gemini.default_model.clone();
            }
        }
        for tool in &mut self.tools {
            if tool.id.trim().is_empty() {
                tool.id = new_id();
            }
        }
        for connection in &mut self.connections {
            if connection.id.trim().is_empty() {
                connection.id = new_id();
            }
        }
    }

    /// Merge two vectors by a key function.
    /// Items from `other` override items in `base` with the same key; an empty key never matches.
    fn merge_vec_by_key<T, F>(base: &mut Vec<T>, other: Vec<T>, key_fn: F)
    where
        F: Fn(&T) -> String,
    {
        use std::collections::HashMap;

        let mut key_to_index: HashMap<String, usize> = HashMap::new();
        for (i, item) in base.iter().enumerate() {
            let key = key_fn(item);
            if !key.is_empty() {
                key_to_index.insert(key, i);
            }
        }

        for item in other {
            let key = key_fn(&item);
            match key_to_index.get(&key) {
                Some(&idx) if !key.is_empty() => base[idx] = item,
                _ => base.push(item),
            }
        }
    }
}

/// Read every `*.json`, `*.yaml`, `*.yml` and `*.toml` file in `path`, sorted by file name
fn load_dir<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, anyhow::Error> {
    let pattern = format!("{}/*", path.display());
    let mut files = Vec::new();
    for entry in glob::glob(&pattern)? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
        }
    }
    files.sort();

    let mut items = Vec::new();
    for file in files {
        let Some(ext) = file.extension().and_then(|e| e.to_str()) else {
            continue;
        };
        if !matches!(ext, "json" | "yaml" | "yml" | "toml") {
            continue;
        }
        let content = std::fs::read_to_string(&file)?;
        let item: T = match ext {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        tracing::debug!(file = %file.display(), "Loaded config entry");
        items.push(item);
    }
    Ok(items)
}

use hangar::config::Settings;
use hangar::domain::{Agent, AgentVariant, Connection, ConnectionType, ParameterType, Tool, ToolParameter};
use std::net::SocketAddr;

pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: String,
}

/// Settings seeded like the sample workspace, pointing at `gemini_base_url`
pub fn seeded_settings(gemini_base_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.gemini.base_url = gemini_base_url.to_string();
    // Never set in the environment, so only the secrets store can provide it
    settings.gemini.api_key_env = "HANGAR_INTEGRATION_GEMINI_KEY".to_string();

    let mut support = Agent::new("1", "Customer Support Lead");
    support.system_instruction = "You are an elite customer support specialist.".to_string();
    support.tools = vec!["t1".to_string()];

    let mut orchestrator = Agent::new("2", "Orchestrator Pro");
    orchestrator.model = "gemini-3-pro-preview".to_string();
    orchestrator.variant = AgentVariant::Super;
    orchestrator.tools = vec!["t1".to_string(), "t2".to_string()];

    settings.agents = vec![support, orchestrator];
    settings.tools = vec![
        Tool::new("t1", "check_order_status", "Retrieve tracking details for a specific order ID.")
            .with_parameter(ToolParameter::new(
                "order_id",
                ParameterType::String,
                "The unique order identifier",
                true,
            )),
        Tool::new("t2", "update_crm_lead", "Update lead status or notes in the CRM system.")
            .with_parameter(ToolParameter::new("email", ParameterType::String, "Customer email address", true))
            .with_parameter(ToolParameter::new("notes", ParameterType::String, "Engagement notes", false)),
    ];
    settings.connections = vec![
        Connection::new("c1", "PostgreSQL Production", ConnectionType::Database),
        Connection::new("c2", "HubSpot Marketing", ConnectionType::Crm),
    ];
    settings
}

impl TestServer {
    pub async fn new(settings: Settings) -> Self {
        let app = hangar::create_app(hangar::build_context(&settings).unwrap());

        // Start server on random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer { addr, base_url }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

use clap::Parser;
use hangar::cli::Cli;
use hangar::config::Settings;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hangar=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::new_with_cli(&cli)?;
    let host = settings.server.host.clone();
    let port = settings.server.port;

    info!(
        agents = settings.agents.len(),
        tools = settings.tools.len(),
        connections = settings.connections.len(),
        gemini = %settings.gemini.base_url,
        "Starting Hangar on {}:{}",
        host,
        port
    );

    let app = hangar::create_app(hangar::build_context(&settings)?);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

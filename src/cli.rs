use clap::Parser;
use std::path::PathBuf;

/// Hangar - configure AI agents and try them in a chat sandbox
#[derive(Parser, Debug, Clone)]
#[command(name = "hangar", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "HANGAR_CONFIG", default_value = "hangar.toml")]
    pub config: PathBuf,

    /// Server host address
    #[arg(long, env = "HANGAR_HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(long, env = "HANGAR_PORT")]
    pub port: Option<u16>,

    /// Base URL of the Gemini REST API
    #[arg(long, env = "HANGAR_GEMINI_BASE_URL")]
    pub gemini_base_url: Option<String>,

    /// Secret key / environment variable holding the Gemini API key
    #[arg(long, env = "HANGAR_API_KEY_ENV")]
    pub api_key_env: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["hangar"]);
        assert_eq!(cli.config, PathBuf::from("hangar.toml"));
        assert!(cli.host.is_none());
        assert!(cli.port.is_none());
        assert!(cli.gemini_base_url.is_none());
    }

    #[test]
    fn test_cli_with_args() {
        let cli = Cli::parse_from([
            "hangar",
            "--config",
            "custom.toml",
            "--host",
            "0.0.0.0",
            "--port",
            "8080",
            "--gemini-base-url",
            "http://localhost:9999/v1beta",
            "--api-key-env",
            "MY_GEMINI_KEY",
        ]);
        assert_eq!(cli.config, PathBuf::from("custom.toml"));
        assert_eq!(cli.host, Some("0.0.0.0".to_string()));
        assert_eq!(cli.port, Some(8080));
        assert_eq!(cli.gemini_base_url.as_deref(), Some("http://localhost:9999/v1beta"));
        assert_eq!(cli.api_key_env.as_deref(), Some("MY_GEMINI_KEY"));
    }
}

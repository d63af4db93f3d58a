//! Application configuration
//!
//! Layering: compiled defaults, then environment variables (absorbed by the
//! clap flags' `env` fallbacks after `dotenvy` loads `.env`), then explicit
//! CLI flags.

use anyhow::Result;

use super::cli::CliConfig;
use super::constants::{DEFAULT_GOAL_SWEEP_MINUTES, DEFAULT_HOST, DEFAULT_PORT};

/// HTTP server binding
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Goal maintenance settings
#[derive(Debug, Clone)]
pub struct GoalsConfig {
    /// Expiry sweep interval in minutes; 0 disables the sweep task
    pub sweep_minutes: u64,
}

impl Default for GoalsConfig {
    fn default() -> Self {
        Self {
            sweep_minutes: DEFAULT_GOAL_SWEEP_MINUTES,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub goals: GoalsConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Resolve the effective configuration from defaults and CLI/env input
    pub fn load(cli: &CliConfig) -> Result<Self> {
        let mut config = Self::default();

        if let Some(host) = &cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(minutes) = cli.goal_sweep_minutes {
            config.goals.sweep_minutes = minutes;
        }
        config.debug = cli.debug;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            sweep_minutes = config.goals.sweep_minutes,
            "Configuration loaded"
        );
        Ok(config)
    }
}

/// True when the host binds every interface
pub fn is_all_interfaces(host: &str) -> bool {
    host == "0.0.0.0" || host == "::"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load(&CliConfig::default()).unwrap();
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.goals.sweep_minutes, DEFAULT_GOAL_SWEEP_MINUTES);
        assert!(!config.debug);
    }

    #[test]
    fn test_cli_overrides() {
        let cli = CliConfig {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            debug: true,
            goal_sweep_minutes: Some(0),
        };
        let config = AppConfig::load(&cli).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.goals.sweep_minutes, 0);
        assert!(config.debug);
    }

    #[test]
    fn test_is_all_interfaces() {
        assert!(is_all_interfaces("0.0.0.0"));
        assert!(is_all_interfaces("::"));
        assert!(!is_all_interfaces("127.0.0.1"));
        assert!(!is_all_interfaces("localhost"));
    }
}

use clap::{Parser, Subcommand};

use super::constants::{ENV_DEBUG, ENV_GOAL_SWEEP_MINUTES, ENV_HOST, ENV_PORT};

#[derive(Parser)]
#[command(name = "tally")]
#[command(version, about = "Habit tracking with streaks and shared party goals", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// Server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,

    /// Enable debug mode (verbose request logging)
    #[arg(long, global = true, env = ENV_DEBUG)]
    pub debug: bool,

    /// Goal expiry sweep interval in minutes (0 = disabled)
    #[arg(long, global = true, env = ENV_GOAL_SWEEP_MINUTES)]
    pub goal_sweep_minutes: Option<u64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Start the server (default command)
    Start,
    /// System maintenance commands
    System {
        #[command(subcommand)]
        command: SystemCommands,
    },
}

#[derive(Subcommand, Clone, Debug)]
pub enum SystemCommands {
    /// Delete the local data directory (database, WAL). Requires confirmation.
    Prune {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: bool,
    pub goal_sweep_minutes: Option<u64>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Option<Commands>) {
    let cli = Cli::parse();
    let config = CliConfig {
        host: cli.host,
        port: cli.port,
        debug: cli.debug,
        goal_sweep_minutes: cli.goal_sweep_minutes,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_defaults() {
        let cli = Cli::try_parse_from(["tally"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.host.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["tally", "-H", "0.0.0.0", "-p", "8080", "--debug"]).unwrap();
        assert_eq!(cli.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cli.port, Some(8080));
        assert!(cli.debug);
    }

    #[test]
    fn test_cli_parses_prune() {
        let cli = Cli::try_parse_from(["tally", "system", "prune", "--yes"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::System {
                command: SystemCommands::Prune { yes: true }
            })
        ));
    }
}

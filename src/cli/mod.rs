//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for colmask using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// colmask - rule-driven column anonymizer
#[derive(Parser, Debug)]
#[command(name = "colmask")]
#[command(version, about, long_about = None)]
#[command(author = "colmask Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "colmask.toml", env = "COLMASK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "COLMASK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize the configured source into the configured output
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["colmask", "run"]);
        assert_eq!(cli.config, "colmask.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from(["colmask", "run", "--dry-run", "--seed", "42"]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.dry_run);
                assert_eq!(args.seed, Some(42));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["colmask", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["colmask", "-l", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["colmask", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["colmask", "init", "--output", "x.toml", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.output, "x.toml");
                assert!(args.force);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}

//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// poll-analytics - statistics, listing, export and charts for polls
#[derive(Parser, Debug)]
#[command(name = "poll-analytics")]
#[command(version)]
#[command(about = "Statistics, listing, export and charts for polls", long_about = None)]
pub struct Cli {
    /// Configuration file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Create the sample polls
    Seed {
        /// Delete all existing polls first
        #[arg(long)]
        clear: bool,
    },

    /// List all polls with their total votes
    Polls,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_none() {
        let cli = Cli::try_parse_from(["poll-analytics"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_seed_with_clear() {
        let cli = Cli::try_parse_from(["poll-analytics", "seed", "--clear"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Seed { clear: true })));
    }

    #[test]
    fn test_global_config_flag() {
        let cli =
            Cli::try_parse_from(["poll-analytics", "polls", "--config", "custom.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("custom.toml"));
        assert!(matches!(cli.command, Some(Commands::Polls)));
    }

    #[test]
    fn test_config_generate() {
        let cli = Cli::try_parse_from(["poll-analytics", "config", "generate", "out.toml", "--force"])
            .unwrap();
        match cli.command {
            Some(Commands::Config {
                action: ConfigCommands::Generate { output_path, force },
            }) => {
                assert_eq!(output_path.as_deref(), Some("out.toml"));
                assert!(force);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}

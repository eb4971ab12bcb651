//! CLI mode
//!
//! Delegates maintenance commands to the CLI interface.

use crate::cli::Commands;
use crate::config::StaticConfig;
use crate::interfaces::cli::{CliError, run_cli_command};

pub async fn run_cli(cmd: Commands, config: &StaticConfig) -> Result<(), CliError> {
    run_cli_command(cmd, config).await
}

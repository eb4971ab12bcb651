//! Generate config command

use std::path::Path;

use colored::Colorize;

use crate::interfaces::cli::CliError;

pub const DEFAULT_OUTPUT_PATH: &str = "config.example.toml";

/// Generate example configuration file
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<(), CliError> {
    let path = output_path.unwrap_or_else(|| DEFAULT_OUTPUT_PATH.to_string());

    if !force && Path::new(&path).exists() {
        println!(
            "{} {} {}",
            "File already exists:".yellow(),
            path.blue(),
            "(use --force to overwrite)".dimmed()
        );
        return Err(CliError::CommandError(format!(
            "Refusing to overwrite {}",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    let config = crate::config::StaticConfig::default();
    match config.save_to_file(&path) {
        Ok(()) => {
            println!(
                "  {} {}",
                "Configuration file generated successfully".green(),
                path.blue()
            );
            println!(
                "  {}",
                "Environment variables with the POLLS__ prefix override file values".dimmed()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "  {} {}",
                "Failed to generate configuration file".red(),
                e.to_string().red()
            );
            Err(CliError::CommandError(format!(
                "Unable to write configuration file: {}",
                e
            )))
        }
    }
}

//! Seed sample polls command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::services::sample_data::seed_sample_data;
use crate::storage::SeaOrmStorage;

pub async fn seed_polls(storage: Arc<SeaOrmStorage>, clear: bool) -> Result<(), CliError> {
    if clear {
        println!("{}", "Clearing existing polls...".yellow());
    }

    let report = seed_sample_data(&storage, clear)
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to seed sample data: {}", e)))?;

    if clear {
        println!(
            "  {} {} polls removed",
            "✓".bold().green(),
            report.removed_polls.to_string().yellow()
        );
    }
    println!(
        "{} Created {} polls with {} votes",
        "✓".bold().green(),
        report.created_polls.to_string().green(),
        report.created_votes.to_string().green()
    );
    Ok(())
}

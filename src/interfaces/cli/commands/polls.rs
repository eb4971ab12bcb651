//! List polls command

use colored::Colorize;
use std::sync::Arc;

use crate::interfaces::cli::CliError;
use crate::storage::{PollFilter, PollRepository, PollSort, SeaOrmStorage, SortKey, SortOrder};

pub async fn list_polls(storage: Arc<SeaOrmStorage>) -> Result<(), CliError> {
    let polls = storage
        .find_filtered(&PollFilter::new(), PollSort::new(SortKey::Date, SortOrder::Asc))
        .await
        .map_err(|e| CliError::CommandError(format!("Failed to load polls: {}", e)))?;

    if polls.is_empty() {
        println!("{} No polls found", "ℹ".bold().blue());
        return Ok(());
    }

    println!("{}", "Poll list:".bold().green());
    println!();
    for poll in &polls {
        println!(
            "  ID: {}, Question: {} {}",
            poll.id.to_string().cyan(),
            poll.question,
            format!("(votes: {})", poll.total_votes).dimmed()
        );
    }
    println!();

    let total_votes: u64 = polls.iter().map(|p| p.total_votes).sum();
    println!(
        "{} Total {} polls, {} votes",
        "ℹ".bold().blue(),
        polls.len().to_string().green(),
        total_votes.to_string().green()
    );
    Ok(())
}

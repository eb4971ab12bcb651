//! Service layer for business logic
//!
//! Each service receives its storage handle at construction and is shared
//! between the HTTP API and the CLI.

pub mod chart;
mod export_service;
mod listing_service;
pub mod sample_data;
mod statistics_service;

pub use chart::{ChartPayload, ChartService};
pub use export_service::*;
pub use listing_service::*;
pub use statistics_service::*;

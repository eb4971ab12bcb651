//! Polls API
//!
//! Read-only JSON endpoints over the poll services.

mod chart;
pub mod error_code;
mod export;
pub mod helpers;
mod listing;
mod routes;
mod statistics;
pub mod types;

pub use error_code::ErrorCode;
pub use helpers::{api_result, error_from_poll, error_response};
pub use routes::polls_routes;
pub use types::*;

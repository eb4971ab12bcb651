//! poll-analytics - analytics over a polls database
//!
//! Computes per-poll vote statistics, lists polls with filters and
//! ordering, exports single-poll reports (JSON / CSV) and renders
//! bar charts, all served over HTTP.
//!
//! # Architecture
//! - `storage`: SeaORM entities access, aggregate queries and mutations
//! - `services`: statistics, listing, export and chart business logic
//! - `api`: HTTP routes, handlers and middleware
//! - `interfaces`: CLI maintenance commands
//! - `config`: Static configuration (TOML + environment)
//! - `runtime`: Execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;

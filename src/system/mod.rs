//! Process-level concerns shared by the server and CLI modes.

pub mod logging;

pub use logging::init_logging;

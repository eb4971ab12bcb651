//! CLI command implementations

mod config_gen;
mod polls;
mod seed;

pub use config_gen::*;
pub use polls::*;
pub use seed::*;

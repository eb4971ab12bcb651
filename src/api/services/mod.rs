pub mod health;
pub mod polls;

pub use health::{HealthService, HealthState, health_routes};
pub use polls::{ErrorCode, polls_routes};

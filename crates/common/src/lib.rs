//! Shared value objects used across the reservation workspace.

pub mod money;
pub mod types;

pub use money::Money;
pub use types::CampId;

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::BudgetError;
pub use crate::core::live::{LiveBudget, LiveState};
pub use crate::core::services::{BudgetService, BudgetSettings};
pub use crate::infrastructure::notifications::in_memory::InMemoryNotifications;
pub use crate::infrastructure::storage::in_memory::InMemoryStorage;
pub use crate::infrastructure::storage::local::LocalStorage;

#[cfg(test)]
mod tests; // Service and API level tests

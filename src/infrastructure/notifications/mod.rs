pub mod in_memory;

use crate::core::errors::BudgetError;
use crate::core::models::Notice;
use async_trait::async_trait;

/// Sink for transient user-facing feedback.
#[async_trait]
pub trait NotificationService: Send + Sync {
    async fn notify(&self, notice: Notice) -> Result<(), BudgetError>;
    async fn recent(&self) -> Result<Vec<Notice>, BudgetError>;
    /// Returns and forgets everything pending.
    async fn drain(&self) -> Result<Vec<Notice>, BudgetError>;
}

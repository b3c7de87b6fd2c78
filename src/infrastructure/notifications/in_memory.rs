use crate::core::errors::BudgetError;
use crate::core::models::Notice;
use crate::infrastructure::notifications::NotificationService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const DEFAULT_CAPACITY: usize = 50;

/// Keeps the most recent notices; the oldest fall off once `capacity` is reached.
#[derive(Clone)]
pub struct InMemoryNotifications {
    notices: Arc<RwLock<VecDeque<Notice>>>,
    capacity: usize,
}

impl InMemoryNotifications {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        InMemoryNotifications {
            notices: Arc::new(RwLock::new(VecDeque::with_capacity(capacity))),
            capacity: capacity.max(1),
        }
    }
}

impl Default for InMemoryNotifications {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationService for InMemoryNotifications {
    async fn notify(&self, notice: Notice) -> Result<(), BudgetError> {
        let mut notices = self.notices.write().await;
        if notices.len() == self.capacity {
            notices.pop_front();
        }
        notices.push_back(notice);
        Ok(())
    }

    async fn recent(&self) -> Result<Vec<Notice>, BudgetError> {
        Ok(self.notices.read().await.iter().cloned().collect())
    }

    async fn drain(&self) -> Result<Vec<Notice>, BudgetError> {
        Ok(self.notices.write().await.drain(..).collect())
    }
}

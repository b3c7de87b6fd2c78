pub mod expense;
pub mod notification;
pub mod summary;
pub mod todo;

pub use expense::{Expense, ExpenseUpdate, NewExpense};
pub use notification::{Notice, NoticeLevel};
pub use summary::{BudgetStatus, BudgetSummary};
pub use todo::ToDoItem;

use crate::infrastructure::storage::Document;
use tracing::warn;

/// Malformed documents are skipped so one bad record cannot break the totals.
pub fn decode_expenses(docs: &[Document]) -> Vec<Expense> {
    docs.iter()
        .filter_map(|doc| match Expense::from_document(doc) {
            Ok(expense) => Some(expense),
            Err(e) => {
                warn!("Skipping malformed expense {}: {}", doc.id, e);
                None
            }
        })
        .collect()
}

pub fn decode_todo_items(docs: &[Document]) -> Vec<ToDoItem> {
    docs.iter()
        .filter_map(|doc| match ToDoItem::from_document(doc) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!("Skipping malformed to-do item {}: {}", doc.id, e);
                None
            }
        })
        .collect()
}

use crate::core::aggregation::summarize;
use crate::core::errors::BudgetError;
use crate::core::format::ExpenseOrdering;
use crate::core::models::{BudgetSummary, Expense, ToDoItem, decode_expenses, decode_todo_items};
use crate::infrastructure::storage::{Collection, Document, SnapshotOrder, Storage, Subscription};
use rust_decimal::Decimal;
use tracing::{debug, error};

#[derive(Clone, Debug, PartialEq)]
pub struct LiveState {
    pub expenses: Vec<Expense>,
    pub todo_items: Vec<ToDoItem>,
    pub summary: BudgetSummary,
}

enum Change {
    Expenses(Vec<Document>),
    TodoItems(Vec<Document>),
}

/// Cached budget state kept in sync with the store through subscriptions on
/// both collections. Derived values are recomputed in full on every change.
///
/// Call [`LiveBudget::close`] (or drop it) when the view goes away so no
/// further snapshots are applied.
pub struct LiveBudget {
    expenses: Subscription,
    todo_items: Subscription,
    total_budget: Decimal,
    ordering: ExpenseOrdering,
    state: LiveState,
}

impl LiveBudget {
    pub async fn start<S>(storage: &S, total_budget: Decimal, ordering: ExpenseOrdering) -> Result<Self, BudgetError>
    where
        S: Storage + ?Sized,
    {
        let mut expenses = storage
            .subscribe(Collection::Expenses, SnapshotOrder::CreatedAtDesc)
            .await?;
        let mut todo_items = storage
            .subscribe(Collection::TodoItems, SnapshotOrder::CreatedAtDesc)
            .await?;

        let closed = || BudgetError::StorageError("subscription closed".to_string());
        let expense_docs = expenses.next().await.ok_or_else(closed)?;
        let todo_docs = todo_items.next().await.ok_or_else(closed)?;

        let expense_list = ordering.apply(decode_expenses(&expense_docs));
        let state = LiveState {
            summary: summarize(&expense_list, total_budget)?,
            expenses: expense_list,
            todo_items: decode_todo_items(&todo_docs),
        };
        Ok(LiveBudget {
            expenses,
            todo_items,
            total_budget,
            ordering,
            state,
        })
    }

    pub fn state(&self) -> &LiveState {
        &self.state
    }

    /// Waits for the next change to either collection and applies it.
    /// `None` once the store has shut down.
    pub async fn next_update(&mut self) -> Option<&LiveState> {
        let change = tokio::select! {
            snapshot = self.expenses.next() => snapshot.map(Change::Expenses),
            snapshot = self.todo_items.next() => snapshot.map(Change::TodoItems),
        }?;

        match change {
            Change::Expenses(docs) => {
                let expenses = self.ordering.apply(decode_expenses(&docs));
                // On overflow the previous summary stays in place.
                match summarize(&expenses, self.total_budget) {
                    Ok(summary) => self.state.summary = summary,
                    Err(e) => error!("Live view: keeping previous summary: {}", e),
                }
                self.state.expenses = expenses;
                debug!("Live view: {} expenses", self.state.expenses.len());
            }
            Change::TodoItems(docs) => {
                self.state.todo_items = decode_todo_items(&docs);
                debug!("Live view: {} to-do items", self.state.todo_items.len());
            }
        }
        Some(&self.state)
    }

    pub fn close(self) {
        self.expenses.unsubscribe();
        self.todo_items.unsubscribe();
    }
}

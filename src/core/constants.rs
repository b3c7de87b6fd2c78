// Action names used in structured log lines.
pub const EXPENSE_ADDED: &str = "expense_added";
pub const EXPENSE_UPDATED: &str = "expense_updated";
pub const EXPENSE_DELETED: &str = "expense_deleted";
pub const TODO_ADDED: &str = "todo_added";
pub const TODO_DELETED: &str = "todo_deleted";
pub const TODO_RECONCILED: &str = "todo_reconciled";
pub const COLLECTION_SEEDED: &str = "collection_seeded";
pub const BUDGET_EXPORTED: &str = "budget_exported";

pub const MAX_TEXT_LENGTH: usize = 200;

/// Largest accepted amount, in euros.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;

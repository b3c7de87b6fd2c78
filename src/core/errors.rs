use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

impl FieldError {
    pub fn new(field: &str, title: &str, description: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Error, Debug, Clone, Serialize, PartialEq, Eq)]
pub enum BudgetError {
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Expense {0} not found")]
    ExpenseNotFound(String),
    #[error("Expense {0} is fixed and cannot be changed")]
    FixedExpenseImmutable(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Calculation error: {0}")]
    Calculation(String),
    #[error("Export error: {0}")]
    Export(String),
    #[error("Notification error: {0}")]
    NotificationError(String),
}

impl BudgetError {
    pub fn invalid(field: &str, title: &str, description: impl Into<String>) -> Self {
        BudgetError::InvalidInput(field.to_string(), FieldError::new(field, title, description))
    }

    /// Rejected before reaching the persistence boundary.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BudgetError::InvalidInput(..) | BudgetError::FixedExpenseImmutable(_)
        )
    }

    /// Transient failures the user may simply try again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BudgetError::StorageError(_) | BudgetError::Export(_))
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        BudgetError::Export(err.to_string())
    }
}

use axum::{Json, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::BudgetError;
use crate::core::format::{ExpenseOrdering, format_currency, format_percentage};
use crate::core::models::{BudgetSummary, Expense, ExpenseUpdate, ToDoItem};
use crate::core::services::AddExpenseOutcome;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddExpenseRequest {
    pub description: String,
    #[schema(value_type = String, example = "785.00")]
    pub amount: Decimal,
    #[serde(default)]
    pub is_fixed: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateExpenseRequest {
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,
}

impl From<UpdateExpenseRequest> for ExpenseUpdate {
    fn from(req: UpdateExpenseRequest) -> Self {
        ExpenseUpdate {
            description: req.description,
            amount: req.amount,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct AddToDoRequest {
    pub text: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExpensesQuery {
    /// `display` (variable before fixed, larger amounts first) or `newest`.
    #[param(value_type = Option<String>)]
    pub order: Option<ExpenseOrdering>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddExpenseResponse {
    pub expense: Expense,
    /// To-do items removed because they matched the new expense.
    pub removed_todos: Vec<ToDoItem>,
    /// Set when the expense was stored but the shopping list could not be updated.
    pub reconciliation_error: Option<String>,
}

impl From<AddExpenseOutcome> for AddExpenseResponse {
    fn from(outcome: AddExpenseOutcome) -> Self {
        let (removed_todos, reconciliation_error) = match outcome.reconciliation {
            Ok(reconciled) => (reconciled.removed, None),
            Err(e) => (Vec::new(), Some(e.to_string())),
        };
        AddExpenseResponse {
            expense: outcome.expense,
            removed_todos,
            reconciliation_error,
        }
    }
}

/// Summary plus the display strings a dashboard shows next to it.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: BudgetSummary,
    pub status_message: String,
    #[schema(value_type = String)]
    pub progress_percentage: Decimal,
    pub formatted: FormattedSummary,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormattedSummary {
    pub total_budget: String,
    pub total_spent: String,
    pub fixed_spent: String,
    pub variable_spent: String,
    pub remaining_budget: String,
    pub percentage_spent: String,
}

impl From<BudgetSummary> for SummaryResponse {
    fn from(summary: BudgetSummary) -> Self {
        SummaryResponse {
            status_message: summary.status.message().to_string(),
            progress_percentage: summary.progress_percentage(),
            formatted: FormattedSummary {
                total_budget: format_currency(summary.total_budget),
                total_spent: format_currency(summary.total_spent),
                fixed_spent: format_currency(summary.fixed_spent),
                variable_spent: format_currency(summary.variable_spent),
                remaining_budget: format_currency(summary.remaining_budget),
                percentage_spent: format_percentage(summary.percentage_spent),
            },
            summary,
        }
    }
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for BudgetError to implement IntoResponse
pub struct ApiError(pub BudgetError);

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            BudgetError::InvalidInput(field, detail) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {}", field, detail.description),
            ),
            BudgetError::ExpenseNotFound(id) => (StatusCode::NOT_FOUND, format!("Expense {} not found", id)),
            BudgetError::FixedExpenseImmutable(id) => (
                StatusCode::CONFLICT,
                format!("Expense {} is fixed and cannot be changed", id),
            ),
            BudgetError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg)),
            BudgetError::Serialization(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Serialization error: {}", msg),
            ),
            BudgetError::Calculation(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Calculation error: {}", msg),
            ),
            BudgetError::Export(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Export error: {}", msg)),
            BudgetError::NotificationError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Notification error: {}", msg),
            ),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}

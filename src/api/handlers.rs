use crate::{
    api::models::*,
    core::{
        errors::BudgetError,
        models::{Expense, Notice, ToDoItem},
        services::{BudgetService, ExportOutcome},
    },
    infrastructure::{
        notifications::{NotificationService, in_memory::InMemoryNotifications},
        storage::Storage,
    },
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};

use std::sync::Arc;

/// Service as mounted by the HTTP layer; the backend is picked at startup.
pub type AppService = BudgetService<InMemoryNotifications, Arc<dyn Storage>>;

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route("/summary", get(get_summary))
        .route("/expenses", get(list_expenses).post(add_expense))
        .route("/expenses/{expense_id}", patch(update_expense).delete(delete_expense))
        .route("/todos", get(list_todos).post(add_todo))
        .route("/todos/{item_id}", delete(delete_todo))
        .route("/export", post(export_budget))
        .route("/notifications", get(drain_notifications))
        .with_state(service)
}

#[utoipa::path(
    get,
    path = "/api/summary",
    responses(
        (status = 200, description = "Budget summary computed", body = SummaryResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn get_summary(State(service): State<Arc<AppService>>) -> Result<Json<SummaryResponse>, ApiError> {
    let summary = service.summary().await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    get,
    path = "/api/expenses",
    params(ExpensesQuery),
    responses(
        (status = 200, description = "Expenses retrieved successfully", body = Vec<Expense>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn list_expenses(
    State(service): State<Arc<AppService>>,
    Query(query): Query<ExpensesQuery>,
) -> Result<Json<Vec<Expense>>, ApiError> {
    let expenses = service.expenses(query.order.unwrap_or_default()).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = AddExpenseRequest,
    responses(
        (status = 201, description = "Expense added; matching to-do items removed", body = AddExpenseResponse),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn add_expense(
    State(service): State<Arc<AppService>>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<(StatusCode, Json<AddExpenseResponse>), ApiError> {
    let outcome = service.add_expense(&req.description, req.amount, req.is_fixed).await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

#[utoipa::path(
    patch,
    path = "/api/expenses/{expense_id}",
    request_body = UpdateExpenseRequest,
    params(
        ("expense_id" = String, Path, description = "ID of the expense to edit")
    ),
    responses(
        (status = 200, description = "Expense updated successfully", body = Expense),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 409, description = "Fixed expenses cannot be edited", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn update_expense(
    State(service): State<Arc<AppService>>,
    Path(expense_id): Path<String>,
    Json(req): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    let expense = service.update_expense(&expense_id, req.into()).await?;
    Ok(Json(expense))
}

#[utoipa::path(
    delete,
    path = "/api/expenses/{expense_id}",
    params(
        ("expense_id" = String, Path, description = "ID of the expense to delete")
    ),
    responses(
        (status = 200, description = "Expense deleted successfully", body = Expense),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 409, description = "Fixed expenses cannot be deleted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn delete_expense(
    State(service): State<Arc<AppService>>,
    Path(expense_id): Path<String>,
) -> Result<Json<Expense>, ApiError> {
    let expense = service
        .delete_expense(&expense_id)
        .await?
        .ok_or_else(|| BudgetError::ExpenseNotFound(expense_id))?;
    Ok(Json(expense))
}

#[utoipa::path(
    get,
    path = "/api/todos",
    responses(
        (status = 200, description = "Shopping list retrieved successfully", body = Vec<ToDoItem>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn list_todos(State(service): State<Arc<AppService>>) -> Result<Json<Vec<ToDoItem>>, ApiError> {
    let items = service.todo_items().await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = AddToDoRequest,
    responses(
        (status = 201, description = "Item added to the shopping list", body = ToDoItem),
        (status = 204, description = "Blank text, nothing added"),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn add_todo(
    State(service): State<Arc<AppService>>,
    Json(req): Json<AddToDoRequest>,
) -> Result<Response, ApiError> {
    Ok(match service.add_todo(&req.text).await? {
        Some(item) => (StatusCode::CREATED, Json(item)).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    })
}

#[utoipa::path(
    delete,
    path = "/api/todos/{item_id}",
    params(
        ("item_id" = String, Path, description = "ID of the to-do item to delete")
    ),
    responses(
        (status = 204, description = "Item removed, or already gone"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn delete_todo(
    State(service): State<Arc<AppService>>,
    Path(item_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    service.delete_todo(&item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/export",
    responses(
        (status = 200, description = "Budget written to the export directory", body = ExportOutcome),
        (status = 500, description = "Export failed", body = ErrorResponse)
    )
)]
async fn export_budget(State(service): State<Arc<AppService>>) -> Result<Json<ExportOutcome>, ApiError> {
    let outcome = service.export_today().await?;
    Ok(Json(outcome))
}

#[utoipa::path(
    get,
    path = "/api/notifications",
    responses(
        (status = 200, description = "Pending notices, oldest first; the queue is emptied", body = Vec<Notice>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
async fn drain_notifications(State(service): State<Arc<AppService>>) -> Result<Json<Vec<Notice>>, ApiError> {
    let notices = service.notifications().drain().await?;
    Ok(Json(notices))
}

use utoipa::OpenApi;

use crate::{
    api::models::{
        AddExpenseRequest, AddExpenseResponse, AddToDoRequest, ErrorResponse, FormattedSummary, SummaryResponse,
        UpdateExpenseRequest,
    },
    core::{
        format::ExpenseOrdering,
        models::{BudgetStatus, BudgetSummary, Expense, Notice, NoticeLevel, ToDoItem},
        services::ExportOutcome,
    },
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::get_summary,
        super::handlers::list_expenses,
        super::handlers::add_expense,
        super::handlers::update_expense,
        super::handlers::delete_expense,
        super::handlers::list_todos,
        super::handlers::add_todo,
        super::handlers::delete_todo,
        super::handlers::export_budget,
        super::handlers::drain_notifications
    ),
    components(schemas(
        AddExpenseRequest,
        AddExpenseResponse,
        UpdateExpenseRequest,
        AddToDoRequest,
        SummaryResponse,
        FormattedSummary,
        ErrorResponse,
        Expense,
        ToDoItem,
        BudgetSummary,
        BudgetStatus,
        ExpenseOrdering,
        ExportOutcome,
        Notice,
        NoticeLevel
    )),
    info(
        title = "Home Budget API",
        description = "API for tracking an apartment budget and its shopping list",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;

use crate::core::aggregation::summarize;
use crate::core::constants::{
    BUDGET_EXPORTED, COLLECTION_SEEDED, EXPENSE_ADDED, EXPENSE_DELETED, EXPENSE_UPDATED, MAX_AMOUNT, MAX_TEXT_LENGTH,
    TODO_ADDED, TODO_DELETED, TODO_RECONCILED,
};
use crate::core::errors::BudgetError;
use crate::core::export::{CsvExportWriter, ExportWriter, build_workbook, export_stem};
use crate::core::format::{ExpenseOrdering, format_currency};
use crate::core::live::LiveBudget;
use crate::core::models::{
    BudgetSummary, Expense, ExpenseUpdate, NewExpense, Notice, ToDoItem, decode_expenses, decode_todo_items,
};
use crate::core::reconcile::{MatchPolicy, ReconcileOutcome, reconcile};
use crate::core::seed;
use crate::infrastructure::notifications::NotificationService;
use crate::infrastructure::storage::{Collection, SnapshotOrder, Storage};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use utoipa::ToSchema;

#[derive(Clone, Debug)]
pub struct BudgetSettings {
    pub total_budget: Decimal,
    pub match_policy: MatchPolicy,
    pub export_dir: PathBuf,
    pub export_prefix: String,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        BudgetSettings {
            total_budget: Decimal::from(230_000),
            match_policy: MatchPolicy::Exact,
            export_dir: PathBuf::from("exports"),
            export_prefix: "rozpocet-bytu".to_string(),
        }
    }
}

/// Result of `add_expense`. The expense is durable even when `reconciliation`
/// failed; the two are reported independently.
#[derive(Debug)]
pub struct AddExpenseOutcome {
    pub expense: Expense,
    pub reconciliation: Result<ReconcileOutcome, BudgetError>,
}

#[derive(Clone, Copy, Debug, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct SeedOutcome {
    pub expenses: bool,
    pub todo_items: bool,
}

#[derive(Clone, Debug, Serialize, ToSchema, PartialEq)]
pub struct ExportOutcome {
    /// `<prefix>-<YYYY-MM-DD>`, shared by every written file.
    pub name: String,
    /// One file per sheet, in sheet order.
    #[schema(value_type = Vec<String>)]
    pub files: Vec<PathBuf>,
    pub expense_count: usize,
}

pub struct BudgetService<N: NotificationService, S: Storage> {
    storage: S,
    notifications: N,
    settings: BudgetSettings,
    exporter: Arc<dyn ExportWriter>,
}

impl<N: NotificationService, S: Storage> BudgetService<N, S> {
    pub fn new(storage: S, notifications: N, settings: BudgetSettings) -> Self {
        info!(
            "Initializing BudgetService (budget {}, {:?} matching)",
            settings.total_budget, settings.match_policy
        );
        BudgetService {
            storage,
            notifications,
            settings,
            exporter: Arc::new(CsvExportWriter),
        }
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn ExportWriter>) -> Self {
        self.exporter = exporter;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notifications(&self) -> &N {
        &self.notifications
    }

    pub fn settings(&self) -> &BudgetSettings {
        &self.settings
    }

    // Feedback must never fail the operation it describes.
    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.notifications.notify(notice).await {
            warn!("Failed to deliver notice: {}", e);
        }
    }

    /// Surfaces persistence failures as a retryable error notice and passes the result through.
    async fn report<T>(&self, result: Result<T, BudgetError>, title: &str) -> Result<T, BudgetError> {
        if let Err(e) = &result {
            if !e.is_validation() {
                error!("{}: {}", title, e);
                let hint = if e.is_retryable() {
                    "Skúste to prosím znova."
                } else {
                    "Operácia sa nepodarila."
                };
                self.notify(Notice::error(title, hint)).await;
            }
        }
        result
    }

    fn validate_text(&self, field: &str, value: &str) -> Result<String, BudgetError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BudgetError::invalid(
                field,
                &format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if trimmed.chars().count() > MAX_TEXT_LENGTH {
            return Err(BudgetError::invalid(
                field,
                &format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, MAX_TEXT_LENGTH),
            ));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(BudgetError::invalid(
                field,
                &format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(trimmed.to_string())
    }

    fn validate_amount(&self, amount: Decimal) -> Result<(), BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::invalid(
                "amount",
                "Invalid Amount",
                "Amount must be greater than 0",
            ));
        }
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(BudgetError::invalid(
                "amount",
                "Invalid Amount",
                format!("Amount cannot exceed {}", MAX_AMOUNT),
            ));
        }
        if amount.normalize().scale() > 2 {
            return Err(BudgetError::invalid(
                "amount",
                "Invalid Amount",
                "Amount cannot have more than 2 decimal places",
            ));
        }
        Ok(())
    }

    async fn find_expense(&self, id: &str) -> Result<Option<Expense>, BudgetError> {
        match self.storage.get(Collection::Expenses, id).await? {
            Some(doc) => Ok(Some(Expense::from_document(&doc)?)),
            None => Ok(None),
        }
    }

    pub async fn add_expense(
        &self,
        description: &str,
        amount: Decimal,
        is_fixed: bool,
    ) -> Result<AddExpenseOutcome, BudgetError> {
        let description = self.validate_text("description", description)?;
        self.validate_amount(amount)?;
        info!("Adding expense '{}' ({})", description, amount);

        let draft = NewExpense::new(description, amount, is_fixed);
        let written = match draft.to_fields() {
            Ok(fields) => self.storage.write_one(Collection::Expenses, fields).await,
            Err(e) => Err(e),
        };
        let doc = self.report(written, "Chyba pri pridávaní výdavku").await?;
        let expense = Expense::from_document(&doc)?;
        debug!(action = EXPENSE_ADDED, id = %expense.id, "Expense stored");
        self.notify(Notice::success(
            "Výdavok pridaný!",
            format!(
                "{} ({}) bol úspešne pridaný.",
                expense.description,
                format_currency(expense.amount)
            ),
        ))
        .await;

        let reconciliation = self.reconcile_todo_list(&expense).await;
        Ok(AddExpenseOutcome { expense, reconciliation })
    }

    async fn reconcile_todo_list(&self, expense: &Expense) -> Result<ReconcileOutcome, BudgetError> {
        match reconcile(&self.storage, expense, self.settings.match_policy).await {
            Ok(outcome) => {
                if !outcome.is_empty() {
                    info!(
                        action = TODO_RECONCILED,
                        count = outcome.removed.len(),
                        "Removed '{}' from the shopping list",
                        expense.description
                    );
                    self.notify(Notice::success(
                        "Automaticky odstránené zo zoznamu!",
                        format!("{} bol odstránený zo zoznamu nákupov.", expense.description),
                    ))
                    .await;
                }
                Ok(outcome)
            }
            Err(e) => {
                error!("Failed to reconcile to-do list for '{}': {}", expense.description, e);
                self.notify(Notice::error(
                    "Chyba pri aktualizácii zoznamu",
                    format!("{} sa nepodarilo odstrániť zo zoznamu nákupov.", expense.description),
                ))
                .await;
                Err(e)
            }
        }
    }

    /// `Ok(None)` when no such expense exists. Fixed expenses are rejected and stay in place.
    pub async fn delete_expense(&self, id: &str) -> Result<Option<Expense>, BudgetError> {
        let found = self.find_expense(id).await;
        let Some(expense) = self.report(found, "Chyba pri odstraňovaní výdavku").await? else {
            debug!("Expense {} not found, nothing to delete", id);
            return Ok(None);
        };
        if expense.is_fixed {
            warn!("Refusing to delete fixed expense {}", id);
            return Err(BudgetError::FixedExpenseImmutable(id.to_string()));
        }

        let deleted = self.storage.delete_one(Collection::Expenses, id).await;
        if !self.report(deleted, "Chyba pri odstraňovaní výdavku").await? {
            // Removed by another client between lookup and delete.
            return Ok(None);
        }
        info!(action = EXPENSE_DELETED, id = %id, "Deleted expense '{}'", expense.description);
        self.notify(Notice::success(
            "Výdavok odstránený!",
            format!("{} bol úspešne odstránený.", expense.description),
        ))
        .await;
        Ok(Some(expense))
    }

    /// Partial update of description and/or amount. Does not re-run reconciliation.
    pub async fn update_expense(&self, id: &str, update: ExpenseUpdate) -> Result<Expense, BudgetError> {
        let update = ExpenseUpdate {
            description: match &update.description {
                Some(description) => Some(self.validate_text("description", description)?),
                None => None,
            },
            amount: update.amount,
        };
        if let Some(amount) = update.amount {
            self.validate_amount(amount)?;
        }

        let found = self.find_expense(id).await;
        let expense = self
            .report(found, "Chyba pri aktualizácii výdavku")
            .await?
            .ok_or_else(|| BudgetError::ExpenseNotFound(id.to_string()))?;
        if expense.is_fixed {
            warn!("Refusing to edit fixed expense {}", id);
            return Err(BudgetError::FixedExpenseImmutable(id.to_string()));
        }
        if update.is_empty() {
            return Ok(expense);
        }

        let updated = match update.to_fields() {
            Ok(fields) => self.storage.update_one(Collection::Expenses, id, fields).await,
            Err(e) => Err(e),
        };
        let doc = self
            .report(updated, "Chyba pri aktualizácii výdavku")
            .await?
            .ok_or_else(|| BudgetError::ExpenseNotFound(id.to_string()))?;
        let expense = Expense::from_document(&doc)?;
        info!(action = EXPENSE_UPDATED, id = %id, "Updated expense '{}'", expense.description);
        self.notify(Notice::success("Výdavok aktualizovaný!", "Zmeny boli úspešne uložené."))
            .await;
        Ok(expense)
    }

    /// Blank text is silently ignored (`Ok(None)`).
    pub async fn add_todo(&self, text: &str) -> Result<Option<ToDoItem>, BudgetError> {
        if text.trim().is_empty() {
            debug!("Ignoring blank to-do item");
            return Ok(None);
        }
        let text = self.validate_text("text", text)?;

        let written = match ToDoItem::fields_for(&text) {
            Ok(fields) => self.storage.write_one(Collection::TodoItems, fields).await,
            Err(e) => Err(e),
        };
        let doc = self.report(written, "Chyba pri pridávaní položky").await?;
        let item = ToDoItem::from_document(&doc)?;
        info!(action = TODO_ADDED, id = %item.id, "Added '{}' to the shopping list", item.text);
        self.notify(Notice::success(
            "Položka pridaná do zoznamu!",
            format!("{} bol pridaný do nákupného zoznamu.", item.text),
        ))
        .await;
        Ok(Some(item))
    }

    /// Returns whether anything was removed.
    pub async fn delete_todo(&self, id: &str) -> Result<bool, BudgetError> {
        let existing = match self.storage.get(Collection::TodoItems, id).await {
            Ok(doc) => doc.and_then(|doc| ToDoItem::from_document(&doc).ok()),
            // The lookup only names the item in the notice; delete regardless
            // and fall back to the generic message.
            Err(e) => {
                warn!("Could not look up to-do item {}: {}", id, e);
                None
            }
        };

        let deleted = self.storage.delete_one(Collection::TodoItems, id).await;
        let removed = self.report(deleted, "Chyba pri odstraňovaní položky").await?;
        if removed {
            info!(action = TODO_DELETED, id = %id, "Removed to-do item");
            let message = match existing {
                Some(item) => format!("{} bol odstránený zo zoznamu.", item.text),
                None => "Položka bola úspešne odstránená.".to_string(),
            };
            self.notify(Notice::success("Položka odstránená!", message)).await;
        }
        Ok(removed)
    }

    pub async fn expenses(&self, ordering: ExpenseOrdering) -> Result<Vec<Expense>, BudgetError> {
        let docs = self.storage.list(Collection::Expenses, SnapshotOrder::CreatedAtDesc).await?;
        Ok(ordering.apply(decode_expenses(&docs)))
    }

    pub async fn todo_items(&self) -> Result<Vec<ToDoItem>, BudgetError> {
        let docs = self.storage.list(Collection::TodoItems, SnapshotOrder::CreatedAtDesc).await?;
        Ok(decode_todo_items(&docs))
    }

    pub async fn summary(&self) -> Result<BudgetSummary, BudgetError> {
        let expenses = self.expenses(ExpenseOrdering::Newest).await?;
        summarize(&expenses, self.settings.total_budget)
    }

    /// Seeds each empty collection once with the built-in household data.
    pub async fn ensure_seeded(&self) -> Result<SeedOutcome, BudgetError> {
        let expenses = seed::initial_expenses()
            .iter()
            .map(NewExpense::to_fields)
            .collect::<Result<Vec<_>, _>>()?;
        let todo_items = seed::initial_todo_items()
            .into_iter()
            .map(ToDoItem::fields_for)
            .collect::<Result<Vec<_>, _>>()?;

        let (expenses, todo_items) = futures::try_join!(
            self.storage.seed_if_empty(Collection::Expenses, expenses),
            self.storage.seed_if_empty(Collection::TodoItems, todo_items),
        )?;
        let outcome = SeedOutcome { expenses, todo_items };
        if outcome.expenses || outcome.todo_items {
            info!(
                action = COLLECTION_SEEDED,
                expenses = outcome.expenses,
                todo_items = outcome.todo_items,
                "Seeded empty collections"
            );
            self.notify(Notice::info(
                "Počiatočné údaje načítané",
                "Rozpočet a nákupný zoznam boli naplnené predvolenými položkami.",
            ))
            .await;
        }
        Ok(outcome)
    }

    pub async fn export(&self, date: NaiveDate) -> Result<ExportOutcome, BudgetError> {
        let result = self.write_export(date).await;
        match &result {
            Ok(outcome) => {
                info!(
                    action = BUDGET_EXPORTED,
                    files = outcome.files.len(),
                    "Budget exported as {}",
                    outcome.name
                );
                self.notify(Notice::success(
                    "Export úspešný!",
                    format!("Export {} bol vytvorený.", outcome.name),
                ))
                .await;
            }
            Err(e) => {
                error!("Export failed: {}", e);
                self.notify(Notice::error(
                    "Chyba pri exporte",
                    "Chyba pri exporte do súboru. Skúste to znova.",
                ))
                .await;
            }
        }
        result
    }

    pub async fn export_today(&self) -> Result<ExportOutcome, BudgetError> {
        self.export(Utc::now().date_naive()).await
    }

    async fn write_export(&self, date: NaiveDate) -> Result<ExportOutcome, BudgetError> {
        let expenses = self.expenses(ExpenseOrdering::Display).await?;
        let summary = summarize(&expenses, self.settings.total_budget)?;
        let workbook = build_workbook(&expenses, &summary);

        let name = export_stem(&self.settings.export_prefix, date);
        tokio::fs::create_dir_all(&self.settings.export_dir)
            .await
            .map_err(|e| BudgetError::Export(format!("Failed to create export directory: {}", e)))?;

        let exporter = self.exporter.clone();
        let dir = self.settings.export_dir.clone();
        let stem = name.clone();
        let files = tokio::task::spawn_blocking(move || exporter.write(&workbook, &dir, &stem))
            .await
            .map_err(|e| BudgetError::Export(format!("Export task failed: {}", e)))??;

        Ok(ExportOutcome {
            name,
            files,
            expense_count: expenses.len(),
        })
    }

    /// Subscribes to both collections; see [`LiveBudget`].
    pub async fn live(&self, ordering: ExpenseOrdering) -> Result<LiveBudget, BudgetError> {
        LiveBudget::start(&self.storage, self.settings.total_budget, ordering).await
    }
}

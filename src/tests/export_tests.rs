use crate::core::errors::BudgetError;
use crate::core::export::{ExportWriter, Workbook};
use crate::core::models::{NewExpense, NoticeLevel};
use crate::core::services::BudgetSettings;
use crate::infrastructure::notifications::NotificationService;
use crate::infrastructure::storage::{Collection, Storage};
use crate::tests::create_test_service_with;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn settings_in(dir: &Path) -> BudgetSettings {
    BudgetSettings {
        export_dir: dir.join("exports"),
        ..BudgetSettings::default()
    }
}

struct FailingWriter;

impl ExportWriter for FailingWriter {
    fn write(&self, _workbook: &Workbook, _dir: &Path, _stem: &str) -> Result<Vec<PathBuf>, BudgetError> {
        Err(BudgetError::Export("disk full".to_string()))
    }
}

#[tokio::test]
async fn test_export_writes_dated_file() {
    let dir = tempfile::tempdir().unwrap();
    let service = create_test_service_with(settings_in(dir.path()));
    service
        .add_expense("Byt - Hypotéka", Decimal::from(150_000), true)
        .await
        .unwrap();
    service.add_expense("Posteľ", Decimal::new(78500, 2), false).await.unwrap();

    let date = NaiveDate::from_ymd_opt(2025, 11, 20).unwrap();
    let outcome = service.export(date).await.unwrap();

    assert_eq!(outcome.name, "rozpocet-bytu-2025-11-20");
    assert_eq!(outcome.expense_count, 2);
    let exports = dir.path().join("exports");
    assert_eq!(
        outcome.files,
        vec![
            exports.join("rozpocet-bytu-2025-11-20-suhrn.csv"),
            exports.join("rozpocet-bytu-2025-11-20-vydavky.csv"),
        ]
    );

    let summary = std::fs::read_to_string(&outcome.files[0]).unwrap();
    assert!(summary.starts_with("Súhrn rozpočtu bytu"));
    assert!(summary.contains("Percentuálne minuté,65.56%"));

    let detail = std::fs::read_to_string(&outcome.files[1]).unwrap();
    assert!(detail.contains("Posteľ,785.00,Variabilný"));
    assert!(detail.contains("Byt - Hypotéka,150000,Fixný"));

    let last = service.notifications().recent().await.unwrap().pop().unwrap();
    assert_eq!(last.title, "Export úspešný!");
}

#[tokio::test]
async fn test_export_of_empty_budget() {
    let dir = tempfile::tempdir().unwrap();
    let service = create_test_service_with(settings_in(dir.path()));

    let outcome = service.export_today().await.unwrap();
    assert_eq!(outcome.expense_count, 0);
    assert_eq!(outcome.files.len(), 2);
    assert!(outcome.files.iter().all(|file| file.exists()));
}

#[tokio::test]
async fn test_export_failure_leaves_budget_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let service = create_test_service_with(settings_in(dir.path())).with_exporter(Arc::new(FailingWriter));
    service.add_expense("Kolky", Decimal::from(200), false).await.unwrap();

    let result = service.export_today().await;
    assert!(matches!(result, Err(BudgetError::Export(_))));
    assert!(result.unwrap_err().is_retryable());

    let last = service.notifications().recent().await.unwrap().pop().unwrap();
    assert_eq!(last.level, NoticeLevel::Error);
    assert_eq!(last.title, "Chyba pri exporte");
    assert_eq!(service.summary().await.unwrap().total_spent, Decimal::from(200));
}

#[tokio::test]
async fn test_export_of_overflowing_totals_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = create_test_service_with(settings_in(dir.path()));
    for _ in 0..2 {
        let fields = NewExpense::new("Drahé", Decimal::MAX, false).to_fields().unwrap();
        service.storage().write_one(Collection::Expenses, fields).await.unwrap();
    }

    let result = service.export_today().await;
    assert!(matches!(result, Err(BudgetError::Calculation(_))));

    let last = service.notifications().recent().await.unwrap().pop().unwrap();
    assert_eq!(last.level, NoticeLevel::Error);
    assert_eq!(last.title, "Chyba pri exporte");
}

use crate::core::errors::BudgetError;
use crate::core::format::{format_currency, format_percentage};
use crate::core::models::{BudgetSummary, Expense};
use chrono::NaiveDate;
use std::fs::File;
use std::path::{Path, PathBuf};

pub const SUMMARY_SHEET: &str = "Súhrn";
pub const DETAIL_SHEET: &str = "Výdavky";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    /// ASCII identifier used where the name cannot go, e.g. file names.
    pub key: String,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

/// Summary sheet with the budget totals, detail sheet with one row per expense.
pub fn build_workbook(expenses: &[Expense], summary: &BudgetSummary) -> Workbook {
    let blank = || vec![String::new(), String::new()];
    let summary_rows = vec![
        vec!["Súhrn rozpočtu bytu".to_string(), String::new()],
        blank(),
        vec!["Celkový rozpočet".to_string(), format_currency(summary.total_budget)],
        vec!["Celkom minuté".to_string(), format_currency(summary.total_spent)],
        vec!["Zostáva".to_string(), format_currency(summary.remaining_budget)],
        vec!["Percentuálne minuté".to_string(), format_percentage(summary.percentage_spent)],
        blank(),
    ];

    let mut detail_rows = vec![
        vec!["Detailný rozpis výdavkov".to_string(), String::new(), String::new(), String::new()],
        vec![String::new(); 4],
        vec![
            "Popis".to_string(),
            "Suma (€)".to_string(),
            "Typ".to_string(),
            "Dátum vytvorenia".to_string(),
        ],
    ];
    detail_rows.extend(expenses.iter().map(|expense| {
        vec![
            expense.description.clone(),
            expense.amount.to_string(),
            if expense.is_fixed { "Fixný" } else { "Variabilný" }.to_string(),
            expense.created_at.format("%-d. %-m. %Y").to_string(),
        ]
    }));

    Workbook {
        sheets: vec![
            Sheet {
                name: SUMMARY_SHEET.to_string(),
                key: "suhrn".to_string(),
                rows: summary_rows,
            },
            Sheet {
                name: DETAIL_SHEET.to_string(),
                key: "vydavky".to_string(),
                rows: detail_rows,
            },
        ],
    }
}

/// `<prefix>-<YYYY-MM-DD>`, the common part of every exported file name.
pub fn export_stem(prefix: &str, date: NaiveDate) -> String {
    format!("{}-{}", prefix, date.format("%Y-%m-%d"))
}

/// `<stem>.<ext>`
pub fn export_filename(stem: &str, extension: &str) -> String {
    format!("{}.{}", stem, extension)
}

/// Serializes a workbook into downloadable files under `dir`.
/// Returns the written paths.
pub trait ExportWriter: Send + Sync {
    fn write(&self, workbook: &Workbook, dir: &Path, stem: &str) -> Result<Vec<PathBuf>, BudgetError>;
}

/// CSV has no sheets, so every sheet goes to its own file named
/// `<stem>-<sheet key>.csv`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CsvExportWriter;

impl CsvExportWriter {
    fn write_sheet(sheet: &Sheet, path: &Path) -> Result<(), BudgetError> {
        let file = File::create(path)
            .map_err(|e| BudgetError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);
        for row in &sheet.rows {
            writer.write_record(row)?;
        }
        writer
            .flush()
            .map_err(|e| BudgetError::Export(format!("Failed to flush {}: {}", path.display(), e)))?;
        Ok(())
    }
}

impl ExportWriter for CsvExportWriter {
    fn write(&self, workbook: &Workbook, dir: &Path, stem: &str) -> Result<Vec<PathBuf>, BudgetError> {
        workbook
            .sheets
            .iter()
            .map(|sheet| {
                let path = dir.join(export_filename(&format!("{}-{}", stem, sheet.key), "csv"));
                Self::write_sheet(sheet, &path)?;
                Ok(path)
            })
            .collect()
    }
}

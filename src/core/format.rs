use crate::core::models::Expense;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use utoipa::ToSchema;

const GROUP_SEPARATOR: char = '\u{a0}';

/// EUR amount the way Slovak locale displays it: `227 973,00 €`.
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.2}", rounded.abs());
    let (whole, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{}{},{}{}€", sign, grouped, fraction, GROUP_SEPARATOR)
}

pub fn format_percentage(percentage: Decimal) -> String {
    format!("{:.2}%", percentage.round_dp(2))
}

/// Display order: variable expenses before fixed ones, larger amounts first
/// within each group. Stable for equal keys.
pub fn sort_expenses(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| a.is_fixed.cmp(&b.is_fixed).then_with(|| b.amount.cmp(&a.amount)));
    expenses
}

/// Storage order: most recently created first.
pub fn sort_by_newest(mut expenses: Vec<Expense>) -> Vec<Expense> {
    expenses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    expenses
}

#[derive(Clone, Copy, Debug, Default, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseOrdering {
    #[default]
    Display,
    Newest,
}

impl ExpenseOrdering {
    pub fn apply(&self, expenses: Vec<Expense>) -> Vec<Expense> {
        match self {
            ExpenseOrdering::Display => sort_expenses(expenses),
            ExpenseOrdering::Newest => sort_by_newest(expenses),
        }
    }
}

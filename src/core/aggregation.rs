//! Budget totals derived from the current expense set. Always a full re-sum.
//!
//! Every step is checked: an expense set whose totals do not fit in a
//! `Decimal` yields `BudgetError::Calculation` instead of a panic.

use crate::core::errors::BudgetError;
use crate::core::models::{BudgetStatus, BudgetSummary, Expense};
use rust_decimal::Decimal;

fn overflow(what: &str) -> BudgetError {
    BudgetError::Calculation(format!("{} overflowed", what))
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>, what: &str) -> Result<Decimal, BudgetError> {
    amounts.try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount).ok_or_else(|| overflow(what))
    })
}

pub fn total_spent(expenses: &[Expense]) -> Result<Decimal, BudgetError> {
    checked_sum(expenses.iter().map(|e| e.amount), "total spent")
}

/// `0` for a non-positive budget rather than a division by zero.
pub fn percentage_spent(total_spent: Decimal, total_budget: Decimal) -> Result<Decimal, BudgetError> {
    if total_budget <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    total_spent
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(total_budget))
        .ok_or_else(|| overflow("percentage spent"))
}

pub fn summarize(expenses: &[Expense], total_budget: Decimal) -> Result<BudgetSummary, BudgetError> {
    let (fixed, variable): (Vec<&Expense>, Vec<&Expense>) = expenses.iter().partition(|e| e.is_fixed);
    let fixed_spent = checked_sum(fixed.iter().map(|e| e.amount), "fixed spent")?;
    let variable_spent = checked_sum(variable.iter().map(|e| e.amount), "variable spent")?;
    let total_spent = fixed_spent
        .checked_add(variable_spent)
        .ok_or_else(|| overflow("total spent"))?;
    let remaining_budget = total_budget
        .checked_sub(total_spent)
        .ok_or_else(|| overflow("remaining budget"))?;
    let percentage_spent = percentage_spent(total_spent, total_budget)?;

    Ok(BudgetSummary {
        total_budget,
        total_spent,
        fixed_spent,
        variable_spent,
        remaining_budget,
        percentage_spent,
        status: BudgetStatus::from_percentage(percentage_spent),
        expense_count: expenses.len(),
    })
}
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn expense(amount: Decimal, is_fixed: bool) -> Expense {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description: "x".to_string(),
            amount,
            is_fixed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn apartment_scenario_is_near_exhaustion() {
        let expenses = vec![
            expense(Decimal::from(150_000), true),
            expense(Decimal::from(77_973), true),
        ];
        let summary = summarize(&expenses, Decimal::from(230_000)).unwrap();

        assert_eq!(summary.total_spent, Decimal::from(227_973));
        assert_eq!(summary.fixed_spent, Decimal::from(227_973));
        assert_eq!(summary.variable_spent, Decimal::ZERO);
        assert_eq!(summary.remaining_budget, Decimal::from(2_027));
        assert_eq!(summary.percentage_spent.round_dp(2), Decimal::new(9912, 2));
        assert_eq!(summary.status, BudgetStatus::NearExhaustion);
    }

    #[test]
    fn total_includes_fixed_and_variable() {
        let expenses = vec![
            expense(Decimal::new(4290, 2), false),
            expense(Decimal::new(70128, 2), false),
            expense(Decimal::from(1000), true),
        ];
        assert_eq!(total_spent(&expenses).unwrap(), Decimal::new(174418, 2));
        let summary = summarize(&expenses, Decimal::from(10_000)).unwrap();
        assert_eq!(summary.total_spent, summary.fixed_spent + summary.variable_spent);
        assert_eq!(summary.expense_count, 3);
    }

    #[test]
    fn overspending_gives_negative_remaining() {
        let summary = summarize(&[expense(Decimal::from(1200), false)], Decimal::from(1000)).unwrap();
        assert_eq!(summary.remaining_budget, Decimal::from(-200));
        assert_eq!(summary.status, BudgetStatus::OverBudget);
        assert!(summary.is_over_budget());
        assert_eq!(summary.progress_percentage(), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn zero_budget_never_divides() {
        let summary = summarize(&[expense(Decimal::from(10), false)], Decimal::ZERO).unwrap();
        assert_eq!(summary.percentage_spent, Decimal::ZERO);
        assert_eq!(summary.status, BudgetStatus::Nominal);
        assert_eq!(percentage_spent(Decimal::from(5), Decimal::from(-1)).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn empty_collection_is_nominal() {
        let summary = summarize(&[], Decimal::from(230_000)).unwrap();
        assert_eq!(summary.total_spent, Decimal::ZERO);
        assert_eq!(summary.remaining_budget, Decimal::from(230_000));
        assert_eq!(summary.status, BudgetStatus::Nominal);
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let half = Decimal::MAX / Decimal::TWO + Decimal::ONE;
        let expenses = vec![expense(half, false), expense(half, false)];
        assert!(matches!(
            summarize(&expenses, Decimal::from(230_000)),
            Err(BudgetError::Calculation(_))
        ));
        assert!(matches!(total_spent(&expenses), Err(BudgetError::Calculation(_))));
    }

    #[test]
    fn overflowing_percentage_is_an_error() {
        assert!(matches!(
            percentage_spent(Decimal::MAX, Decimal::from(230_000)),
            Err(BudgetError::Calculation(_))
        ));
        let result = summarize(&[expense(Decimal::MAX, true)], Decimal::from(230_000));
        assert!(matches!(result, Err(BudgetError::Calculation(_))));
    }

    #[test]
    fn status_band_edges() {
        assert_eq!(BudgetStatus::from_percentage(Decimal::new(7499, 2)), BudgetStatus::Nominal);
        assert_eq!(BudgetStatus::from_percentage(Decimal::from(75)), BudgetStatus::ApproachingLimit);
        assert_eq!(
            BudgetStatus::from_percentage(Decimal::new(8999, 2)),
            BudgetStatus::ApproachingLimit
        );
        assert_eq!(BudgetStatus::from_percentage(Decimal::from(90)), BudgetStatus::NearExhaustion);
        assert_eq!(BudgetStatus::from_percentage(Decimal::from(100)), BudgetStatus::NearExhaustion);
        assert_eq!(BudgetStatus::from_percentage(Decimal::new(10001, 2)), BudgetStatus::OverBudget);
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BudgetStatus {
    Nominal,
    ApproachingLimit,
    NearExhaustion,
    OverBudget,
}

impl BudgetStatus {
    /// Band for a spent percentage: `> 100` over, `[90, 100]` near, `[75, 90)` approaching.
    pub fn from_percentage(percentage: Decimal) -> Self {
        if percentage > Decimal::ONE_HUNDRED {
            BudgetStatus::OverBudget
        } else if percentage >= Decimal::from(90) {
            BudgetStatus::NearExhaustion
        } else if percentage >= Decimal::from(75) {
            BudgetStatus::ApproachingLimit
        } else {
            BudgetStatus::Nominal
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BudgetStatus::Nominal => "Všetko v poriadku, rozpočet je pod kontrolou.",
            BudgetStatus::ApproachingLimit => "Blížite sa k limitu rozpočtu.",
            BudgetStatus::NearExhaustion => "Varovanie: Rozpočet je takmer vyčerpaný!",
            BudgetStatus::OverBudget => "Pozor! Prekročili ste rozpočet.",
        }
    }
}

impl std::fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BudgetStatus::Nominal => "NOMINAL",
            BudgetStatus::ApproachingLimit => "APPROACHING_LIMIT",
            BudgetStatus::NearExhaustion => "NEAR_EXHAUSTION",
            BudgetStatus::OverBudget => "OVER_BUDGET",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    pub total_budget: Decimal,
    pub total_spent: Decimal,
    pub fixed_spent: Decimal,
    pub variable_spent: Decimal,
    pub remaining_budget: Decimal,
    pub percentage_spent: Decimal,
    pub status: BudgetStatus,
    pub expense_count: usize,
}

impl BudgetSummary {
    /// Width of a progress bar; never wider than full.
    pub fn progress_percentage(&self) -> Decimal {
        self.percentage_spent.min(Decimal::ONE_HUNDRED)
    }

    pub fn is_over_budget(&self) -> bool {
        self.remaining_budget.is_sign_negative() && !self.remaining_budget.is_zero()
    }
}

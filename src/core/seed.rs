//! Household data written on first run when a collection is empty.

use crate::core::models::NewExpense;
use rust_decimal::Decimal;

pub fn initial_expenses() -> Vec<NewExpense> {
    [
        ("Posteľ", 78500, false),
        ("Batéria", 4290, false),
        ("Chladnička", 70128, false),
        ("Umývačka", 62665, false),
        ("Rúra", 41607, false),
        ("Varná doska", 26400, false),
        ("Spálňová zostava", 188000, false),
        ("Skriňa chodba", 168000, false),
        ("Kuchynská linka s digestorom a drezom", 644000, false),
        ("Kolky", 20000, false),
        ("Elektromer", 17195, false),
        ("Byt - Hypotéka", 15000000, true),
        ("Byt - Vlastné zdroje", 7797300, true),
    ]
    .into_iter()
    .map(|(description, cents, is_fixed)| NewExpense::new(description, Decimal::new(cents, 2), is_fixed))
    .collect()
}

pub fn initial_todo_items() -> Vec<&'static str> {
    vec![
        "Sušička",
        "Matrace",
        "Gauč",
        "Jed. stôl",
        "Stoličky",
        "Zrkadlo",
        "Komoda",
        "Svietidlá",
        "Taburetka",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_seed_costs_match_apartment_price() {
        let fixed: Decimal = initial_expenses()
            .iter()
            .filter(|e| e.is_fixed)
            .map(|e| e.amount)
            .sum();
        assert_eq!(fixed, Decimal::from(227_973));
        assert!(initial_expenses().iter().all(|e| e.amount > Decimal::ZERO));
    }
}

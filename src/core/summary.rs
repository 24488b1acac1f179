//! Trip-level totals for report surfaces

use crate::types::{Advance, Category, Expense};
use rust_decimal::Decimal;

/// Aggregate totals of one trip
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripSummary {
    pub total_expenses: Decimal,
    pub total_advances: Decimal,
    pub expense_count: usize,
    pub advance_count: usize,
    /// Expense totals per category, in first-seen order
    pub by_category: Vec<(Category, Decimal)>,
}

impl TripSummary {
    /// Total spent in one category
    pub fn category_total(&self, category: Category) -> Decimal {
        self.by_category
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, total)| *total)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Summarize expenses and advances
///
/// Amounts are taken as given; validation is the engine's job. Totals
/// saturate at the `Decimal` bounds.
pub fn summarize(expenses: &[Expense], advances: &[Advance]) -> TripSummary {
    let mut summary = TripSummary {
        expense_count: expenses.len(),
        advance_count: advances.len(),
        ..TripSummary::default()
    };

    for expense in expenses {
        summary.total_expenses = summary.total_expenses.saturating_add(expense.amount);
        match summary.by_category.iter_mut().find(|(c, _)| *c == expense.category) {
            Some((_, total)) => *total = total.saturating_add(expense.amount),
            None => summary.by_category.push((expense.category, expense.amount)),
        }
    }

    summary.total_advances = advances
        .iter()
        .fold(Decimal::ZERO, |sum, a| sum.saturating_add(a.amount));
    summary
}

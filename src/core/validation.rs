//! Boundary validation for expenses and advances
//!
//! Records that violate the basic invariants are rejected before they reach
//! the accumulator. Nothing is clamped or repaired.

use crate::types::{Advance, Expense, RecordRef, SettlementError, SplitMethod};
use rust_decimal::Decimal;

/// Validate an expense
///
/// # Errors
///
/// - `InvalidAmount` if the amount is zero or negative
/// - `NegativeWeight` if a weighted split carries a negative weight
pub fn validate_expense(expense: &Expense) -> Result<(), SettlementError> {
    if expense.amount <= Decimal::ZERO {
        return Err(SettlementError::invalid_amount(
            RecordRef::Expense(expense.id.clone()),
            expense.amount,
        ));
    }

    if let SplitMethod::Weighted(weights) = &expense.split {
        if let Some(entry) = weights.iter().find(|e| e.weight < Decimal::ZERO) {
            return Err(SettlementError::negative_weight(
                &expense.id,
                &entry.member_id,
                entry.weight,
            ));
        }
    }

    Ok(())
}

/// Validate an advance
///
/// # Errors
///
/// - `InvalidAmount` if the amount is zero or negative
/// - `SelfAdvance` if payer and recipient are the same member
pub fn validate_advance(advance: &Advance) -> Result<(), SettlementError> {
    if advance.amount <= Decimal::ZERO {
        return Err(SettlementError::invalid_amount(
            RecordRef::Advance(advance.id.clone()),
            advance.amount,
        ));
    }

    if advance.paid_by == advance.paid_to {
        return Err(SettlementError::self_advance(&advance.id, &advance.paid_by));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, Eligibility, WeightEntry};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn expense(amount: Decimal, split: SplitMethod) -> Expense {
        Expense {
            id: "e1".to_string(),
            trip_id: "t1".to_string(),
            amount,
            description: "Museum".to_string(),
            category: Category::Activity,
            paid_by: "m1".to_string(),
            split,
            eligibility: Eligibility::Legacy,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn advance(amount: Decimal, paid_by: &str, paid_to: &str) -> Advance {
        Advance {
            id: "a1".to_string(),
            trip_id: "t1".to_string(),
            amount,
            description: "Pocket money".to_string(),
            paid_by: paid_by.to_string(),
            paid_to: paid_to.to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    #[rstest]
    #[case::positive(Decimal::new(1, 2), true)]
    #[case::large(Decimal::from(1_000_000), true)]
    #[case::zero(Decimal::ZERO, false)]
    #[case::negative(Decimal::from(-10), false)]
    fn test_validate_expense_amount(#[case] amount: Decimal, #[case] valid: bool) {
        let result = validate_expense(&expense(amount, SplitMethod::Equal));
        assert_eq!(result.is_ok(), valid);
        if !valid {
            assert!(matches!(result, Err(SettlementError::InvalidAmount { .. })));
        }
    }

    #[test]
    fn test_validate_expense_rejects_negative_weight() {
        let split = SplitMethod::Weighted(vec![
            WeightEntry::new("m1", Decimal::ONE),
            WeightEntry::new("m2", Decimal::from(-2)),
        ]);

        let result = validate_expense(&expense(Decimal::from(10), split));

        assert_eq!(
            result,
            Err(SettlementError::NegativeWeight {
                expense_id: "e1".to_string(),
                member_id: "m2".to_string(),
                weight: Decimal::from(-2),
            })
        );
    }

    #[test]
    fn test_validate_expense_accepts_zero_weight() {
        let split = SplitMethod::Weighted(vec![WeightEntry::new("m1", Decimal::ZERO)]);
        assert!(validate_expense(&expense(Decimal::from(10), split)).is_ok());
    }

    #[rstest]
    #[case::valid(Decimal::from(50), "m1", "m2", None)]
    #[case::zero(Decimal::ZERO, "m1", "m2", Some("Invalid amount"))]
    #[case::negative(Decimal::from(-1), "m1", "m2", Some("Invalid amount"))]
    #[case::self_advance(Decimal::from(50), "m1", "m1", Some("same member"))]
    fn test_validate_advance(
        #[case] amount: Decimal,
        #[case] paid_by: &str,
        #[case] paid_to: &str,
        #[case] expected_error: Option<&str>,
    ) {
        let result = validate_advance(&advance(amount, paid_by, paid_to));
        match expected_error {
            None => assert!(result.is_ok()),
            Some(message) => assert!(result.unwrap_err().to_string().contains(message)),
        }
    }
}

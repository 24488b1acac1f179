//! Derived settlement types
//!
//! Settlements are recomputed on demand from expenses, advances and members.
//! They are never a source of truth on their own.

use super::member::MemberId;
use rust_decimal::Decimal;

/// One member's allocated part of a single expense
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    pub member_id: MemberId,
    pub amount: Decimal,
}

impl Share {
    pub fn new(member_id: impl Into<MemberId>, amount: Decimal) -> Self {
        Share {
            member_id: member_id.into(),
            amount,
        }
    }
}

/// Computed net position of one member
///
/// Positive `balance` means the member is owed money, negative means the
/// member owes money.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub member_id: MemberId,
    pub member_name: String,

    /// Sum of expense amounts this member fronted whose cost was shared
    pub total_paid: Decimal,

    /// Sum of this member's allocated shares across all expenses
    pub total_expenses: Decimal,

    /// Advances paid minus advances received
    pub total_advances: Decimal,

    /// `total_paid + total_advances - total_expenses`
    pub balance: Decimal,
}

impl Settlement {
    /// Create a settlement row with zero activity
    pub fn new(member_id: impl Into<MemberId>, member_name: impl Into<String>) -> Self {
        Settlement {
            member_id: member_id.into(),
            member_name: member_name.into(),
            total_paid: Decimal::ZERO,
            total_expenses: Decimal::ZERO,
            total_advances: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Balance implied by the running totals, `None` if it is not representable
    pub fn checked_balance(&self) -> Option<Decimal> {
        self.total_paid
            .checked_sub(self.total_expenses)?
            .checked_add(self.total_advances)
    }

    /// Recompute `balance` from the running totals
    ///
    /// Saturates at the `Decimal` bounds where `checked_balance` is `None`.
    pub fn refresh_balance(&mut self) {
        self.balance = self
            .total_paid
            .saturating_sub(self.total_expenses)
            .saturating_add(self.total_advances);
    }
}

/// Suggested point-to-point payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from_member_id: MemberId,
    pub to_member_id: MemberId,

    /// Always positive, rounded to the currency's minor unit
    pub amount: Decimal,
}

//! Balance accumulation module
//!
//! This module provides the `BalanceAccumulator` struct which folds expenses
//! and advances into one running balance per member.
//!
//! The BalanceAccumulator is responsible for:
//! - Creating one zeroed entry per member, in member-list order
//! - Crediting payers and debiting shares for each expense
//! - Posting advances between payer and recipient
//! - Reporting postings that reference members not on the trip
//! - Skipping records whose postings would overflow the `Decimal` range
//!
//! Accumulation is `Decimal` addition, so the order in which expenses and
//! advances are applied does not change the result. Each record is posted
//! whole or not at all.

use crate::core::split_resolver::resolve_split;
use crate::types::{
    Advance, DataQualityWarning, Expense, Member, MemberId, RecordRef, Settlement,
};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::warn;

/// Running balances for every member of one trip
pub struct BalanceAccumulator<'a> {
    /// Authoritative member list
    members: &'a [Member],

    /// Settlement rows in member-list order
    entries: Vec<Settlement>,

    /// Map of member IDs to positions in `entries`
    index: HashMap<MemberId, usize>,

    /// Data-quality warnings collected so far
    warnings: Vec<DataQualityWarning>,
}

impl<'a> BalanceAccumulator<'a> {
    /// Create an accumulator with one zeroed entry per member
    ///
    /// If the member list contains the same id twice, the first occurrence
    /// receives all postings.
    pub fn new(members: &'a [Member]) -> Self {
        let entries: Vec<Settlement> = members
            .iter()
            .map(|m| Settlement::new(m.id.as_str(), m.name.as_str()))
            .collect();

        let mut index = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            index.entry(member.id.clone()).or_insert(position);
        }

        BalanceAccumulator {
            members,
            entries,
            index,
            warnings: Vec::new(),
        }
    }

    /// Apply one validated expense
    ///
    /// Every allocated share is added to that member's `total_expenses`.
    /// The payer is credited with the full amount in `total_paid`, but only
    /// when something was allocated: an expense nobody shares leaves every
    /// balance untouched.
    pub fn apply_expense(&mut self, expense: &Expense) {
        let resolved = resolve_split(expense, self.members);

        for warning in &resolved.warnings {
            warn!(expense = %expense.id, "{}", warning);
        }
        self.warnings.extend(resolved.warnings.iter().cloned());

        if !resolved.is_allocated() {
            return;
        }

        // Shares are only ever produced for listed members
        let mut postings: Vec<(usize, Column, Decimal)> = resolved
            .shares
            .iter()
            .filter_map(|share| {
                let position = *self.index.get(&share.member_id)?;
                Some((position, Column::Expenses, share.amount))
            })
            .collect();

        let record = RecordRef::Expense(expense.id.clone());
        if let Some(position) = self.position_or_warn(&record, &expense.paid_by) {
            postings.push((position, Column::Paid, expense.amount));
        }

        self.post(&record, &postings);
    }

    /// Apply one validated advance
    ///
    /// Adds the amount to the payer's `total_advances` and subtracts it from
    /// the recipient's. A side that references an unknown member is skipped
    /// with a warning; the other side is still posted.
    pub fn apply_advance(&mut self, advance: &Advance) {
        let record = RecordRef::Advance(advance.id.clone());
        let mut postings = Vec::with_capacity(2);

        if let Some(position) = self.position_or_warn(&record, &advance.paid_by) {
            postings.push((position, Column::Advances, advance.amount));
        }

        if let Some(position) = self.position_or_warn(&record, &advance.paid_to) {
            postings.push((position, Column::Advances, -advance.amount));
        }

        self.post(&record, &postings);
    }

    /// Current settlement row for a member
    pub fn get(&self, member_id: &str) -> Option<&Settlement> {
        self.index.get(member_id).map(|&position| &self.entries[position])
    }

    /// Warnings collected so far
    pub fn warnings(&self) -> &[DataQualityWarning] {
        &self.warnings
    }

    /// Finalize balances
    ///
    /// # Returns
    ///
    /// One settlement per member (including members with no activity) in
    /// member-list order, and all warnings collected.
    pub fn finish(mut self) -> (Vec<Settlement>, Vec<DataQualityWarning>) {
        for entry in &mut self.entries {
            entry.refresh_balance();
        }
        (self.entries, self.warnings)
    }

    fn position_or_warn(&mut self, record: &RecordRef, member_id: &str) -> Option<usize> {
        let position = self.index.get(member_id).copied();
        if position.is_none() {
            warn!(%record, member = member_id, "posting references unknown member");
            self.warnings.push(DataQualityWarning::UnknownMember {
                record: record.clone(),
                member_id: member_id.to_string(),
            });
        }
        position
    }

    /// Apply all postings of one record, or none of them
    ///
    /// A record whose totals or balances would leave the `Decimal` range is
    /// skipped with an `AmountOverflow` warning.
    fn post(&mut self, record: &RecordRef, postings: &[(usize, Column, Decimal)]) {
        let mut staged: HashMap<usize, Settlement> = HashMap::with_capacity(postings.len());

        for &(position, column, delta) in postings {
            let entry = staged
                .entry(position)
                .or_insert_with(|| self.entries[position].clone());
            let total = match column {
                Column::Paid => &mut entry.total_paid,
                Column::Expenses => &mut entry.total_expenses,
                Column::Advances => &mut entry.total_advances,
            };
            match total.checked_add(delta) {
                Some(updated) => *total = updated,
                None => return self.reject_overflow(record),
            }
        }

        if staged.values().any(|entry| entry.checked_balance().is_none()) {
            return self.reject_overflow(record);
        }

        for (position, entry) in staged {
            self.entries[position] = entry;
        }
    }

    fn reject_overflow(&mut self, record: &RecordRef) {
        warn!(%record, "posting overflows the amount range");
        self.warnings.push(DataQualityWarning::AmountOverflow {
            record: record.clone(),
        });
    }
}

/// Running total a posting adds to
#[derive(Debug, Clone, Copy)]
enum Column {
    Paid,
    Expenses,
    Advances,
}

/// Sum of all balances
///
/// Zero for consistent input; anything else is the discrepancy that transfer
/// suggestion refuses to paper over.
///
/// Saturates at the `Decimal` bounds instead of overflowing.
pub fn balance_sum(settlements: &[Settlement]) -> Decimal {
    settlements
        .iter()
        .fold(Decimal::ZERO, |sum, s| sum.saturating_add(s.balance))
}

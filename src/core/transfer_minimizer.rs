//! Transfer minimization module
//!
//! Proposes point-to-point payments that bring every balance to zero using
//! greedy largest-creditor / largest-debtor matching. Each step settles at
//! least one member completely, so `N` members with non-zero balance need at
//! most `N - 1` transfers.
//!
//! The transfer list is a convenience view. The authoritative position of a
//! member is always its settlement balance.

use crate::core::balance_accumulator::balance_sum;
use crate::types::{Settlement, SettlementError, Transfer};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

/// Suggest transfers that settle all balances
///
/// # Arguments
///
/// * `settlements` - Per-member balances (positive = is owed money)
/// * `tolerance` - Balances within this distance of zero count as settled
/// * `minor_units` - Decimal places of the currency's minor unit
///
/// # Returns
///
/// Ordered transfers from debtor to creditor. Ties between equally large
/// balances go to the member that appears first in `settlements`.
///
/// # Errors
///
/// Returns `SettlementError::DataIntegrity` when the balances do not sum to
/// zero within `tolerance`.
pub fn minimize_transfers(
    settlements: &[Settlement],
    tolerance: Decimal,
    minor_units: u32,
) -> Result<Vec<Transfer>, SettlementError> {
    let discrepancy = balance_sum(settlements);
    if discrepancy.abs() > tolerance {
        return Err(SettlementError::data_integrity(discrepancy, tolerance));
    }

    // Sub-tolerance balances stay matchable: several of them may offset one
    // balance that is not
    let mut open: Vec<(&str, Decimal)> = settlements
        .iter()
        .filter(|s| !s.balance.is_zero())
        .map(|s| (s.member_id.as_str(), s.balance))
        .collect();

    let mut transfers = Vec::with_capacity(open.len().saturating_sub(1));

    while open.iter().any(|(_, balance)| balance.abs() > tolerance) {
        let (Some(creditor), Some(debtor)) = (largest_creditor(&open), largest_debtor(&open))
        else {
            break;
        };

        let amount = open[creditor].1.min(-open[debtor].1);
        open[creditor].1 -= amount;
        open[debtor].1 += amount;

        let rounded = amount.round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero);
        if rounded > Decimal::ZERO {
            debug!(from = open[debtor].0, to = open[creditor].0, %rounded, "transfer");
            transfers.push(Transfer {
                from_member_id: open[debtor].0.to_string(),
                to_member_id: open[creditor].0.to_string(),
                amount: rounded,
            });
        }

        open.retain(|(_, balance)| !balance.is_zero());
    }

    Ok(transfers)
}

fn largest_creditor(open: &[(&str, Decimal)]) -> Option<usize> {
    open.iter()
        .enumerate()
        .filter(|(_, (_, balance))| *balance > Decimal::ZERO)
        .fold(None, |best: Option<(usize, Decimal)>, (index, (_, balance))| match best {
            Some((_, top)) if top >= *balance => best,
            _ => Some((index, *balance)),
        })
        .map(|(index, _)| index)
}

fn largest_debtor(open: &[(&str, Decimal)]) -> Option<usize> {
    open.iter()
        .enumerate()
        .filter(|(_, (_, balance))| *balance < Decimal::ZERO)
        .fold(None, |best: Option<(usize, Decimal)>, (index, (_, balance))| match best {
            Some((_, bottom)) if bottom <= *balance => best,
            _ => Some((index, *balance)),
        })
        .map(|(index, _)| index)
}

//! Settlement engine
//!
//! This module provides the `SettlementEngine` that orchestrates a settlement
//! run by coordinating validation, the `BalanceAccumulator` and the transfer
//! minimizer.
//!
//! The engine enforces these rules:
//! - Invalid records are rejected before accumulation and reported
//! - Data-quality problems never abort the run
//! - Transfer suggestion refuses balances that do not sum to zero

use crate::core::balance_accumulator::{balance_sum, BalanceAccumulator};
use crate::core::transfer_minimizer::minimize_transfers;
use crate::core::validation::{validate_advance, validate_expense};
use crate::types::{
    Advance, DataQualityWarning, Expense, Member, Settlement, SettlementError, Transfer, Trip,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Highest scale a `Decimal` can carry
const MAX_MINOR_UNITS: u32 = 28;

/// Configuration for a settlement run
///
/// Controls the zero-sum tolerance and the precision used when rounding at
/// output boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Balances within this distance of zero count as settled
    pub tolerance: Decimal,
    /// Decimal places of the currency's minor unit
    pub minor_units: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tolerance: Decimal::new(1, 2),
            minor_units: 2,
        }
    }
}

impl EngineConfig {
    /// Create a new EngineConfig with custom values
    ///
    /// Out-of-range values fall back to the defaults with a warning.
    pub fn new(tolerance: Decimal, minor_units: u32) -> Self {
        let default = Self::default();

        let tolerance = if tolerance < Decimal::ZERO {
            warn!(
                "Invalid tolerance ({}), using default ({})",
                tolerance, default.tolerance
            );
            default.tolerance
        } else {
            tolerance
        };

        let minor_units = if minor_units > MAX_MINOR_UNITS {
            warn!(
                "Invalid minor_units ({}), using default ({})",
                minor_units, default.minor_units
            );
            default.minor_units
        } else {
            minor_units
        };

        Self {
            tolerance,
            minor_units,
        }
    }

    /// Configuration matching a trip's currency precision
    pub fn for_trip(trip: &Trip) -> Self {
        Self::new(Self::default().tolerance, trip.minor_units)
    }
}

/// Outcome of `compute_settlements`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementReport {
    /// One row per member, in member-list order
    pub settlements: Vec<Settlement>,
    /// Non-fatal data-quality problems
    pub warnings: Vec<DataQualityWarning>,
    /// Records rejected at the boundary
    pub rejected: Vec<SettlementError>,
}

impl SettlementReport {
    /// Sum of all balances (zero for consistent input)
    pub fn discrepancy(&self) -> Decimal {
        balance_sum(&self.settlements)
    }

    /// Whether the balances sum to zero within `tolerance`
    pub fn is_balanced(&self, tolerance: Decimal) -> bool {
        self.discrepancy().abs() <= tolerance
    }

    /// Settlement row for a member
    pub fn settlement_for(&self, member_id: &str) -> Option<&Settlement> {
        self.settlements.iter().find(|s| s.member_id == member_id)
    }
}

/// Settlement engine
///
/// Stateless apart from its configuration: the same input always yields the
/// same output, and one engine can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine {
    config: EngineConfig,
}

impl SettlementEngine {
    /// Create an engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        SettlementEngine { config }
    }

    /// Configuration this engine settles with
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute per-member balances
    ///
    /// Never fails. Invalid records are skipped and listed in
    /// `rejected`; the resulting balances are best effort even when they do
    /// not sum to zero, so the discrepancy stays visible.
    ///
    /// # Arguments
    ///
    /// * `expenses` - All expenses of the trip
    /// * `advances` - All advances of the trip
    /// * `members` - Authoritative member list
    pub fn compute_settlements(
        &self,
        expenses: &[Expense],
        advances: &[Advance],
        members: &[Member],
    ) -> SettlementReport {
        let mut accumulator = BalanceAccumulator::new(members);
        let mut rejected = Vec::new();

        for expense in expenses {
            match validate_expense(expense) {
                Ok(()) => accumulator.apply_expense(expense),
                Err(e) => {
                    warn!("Rejected expense: {}", e);
                    rejected.push(e);
                }
            }
        }

        for advance in advances {
            match validate_advance(advance) {
                Ok(()) => accumulator.apply_advance(advance),
                Err(e) => {
                    warn!("Rejected advance: {}", e);
                    rejected.push(e);
                }
            }
        }

        let (settlements, warnings) = accumulator.finish();
        let report = SettlementReport {
            settlements,
            warnings,
            rejected,
        };

        debug!(
            members = members.len(),
            expenses = expenses.len(),
            advances = advances.len(),
            warnings = report.warnings.len(),
            rejected = report.rejected.len(),
            discrepancy = %report.discrepancy(),
            "settlements computed"
        );

        report
    }

    /// Suggest transfers that bring every balance to zero
    ///
    /// # Errors
    ///
    /// Returns `SettlementError::DataIntegrity` with the discrepancy when the
    /// balances do not sum to zero within the configured tolerance.
    pub fn suggest_transfers(
        &self,
        settlements: &[Settlement],
    ) -> Result<Vec<Transfer>, SettlementError> {
        minimize_transfers(settlements, self.config.tolerance, self.config.minor_units)
    }
}

/// Compute settlements with the default configuration
pub fn compute_settlements(
    expenses: &[Expense],
    advances: &[Advance],
    members: &[Member],
) -> SettlementReport {
    SettlementEngine::default().compute_settlements(expenses, advances, members)
}

/// Suggest transfers with the default configuration
pub fn suggest_transfers(settlements: &[Settlement]) -> Result<Vec<Transfer>, SettlementError> {
    SettlementEngine::default().suggest_transfers(settlements)
}

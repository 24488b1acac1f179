//! Error types for the trip settlement engine
//!
//! This module defines the errors and warnings the engine reports.
//! Nothing here is ever raised as a panic: every problem travels as data so
//! that one malformed record never prevents settling the rest of the trip.
//!
//! # Error Categories
//!
//! - **Invalid input**: non-positive amounts, self-advances, negative weights.
//!   The offending record is rejected before accumulation.
//! - **Data integrity**: balances that do not sum to zero. Fatal to transfer
//!   suggestion only.
//! - **Parse errors**: malformed CSV fields.
//! - **Data-quality warnings** (`DataQualityWarning`): non-fatal problems
//!   where an expense contributes fewer shares than expected.

use super::advance::AdvanceId;
use super::expense::ExpenseId;
use super::member::MemberId;
use super::trip::TripId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Reference to the source record an error or warning is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordRef {
    Expense(ExpenseId),
    Advance(AdvanceId),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Expense(id) => write!(f, "expense {}", id),
            RecordRef::Advance(id) => write!(f, "advance {}", id),
        }
    }
}

/// Main error type for the settlement engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    /// Amount on an expense or advance is zero or negative
    ///
    /// Caller error: the record is rejected, never clamped.
    #[error("Invalid amount {amount} on {record}: amount must be positive")]
    InvalidAmount {
        /// Offending record
        record: RecordRef,
        /// The rejected amount
        amount: Decimal,
    },

    /// Advance whose payer and recipient are the same member
    #[error("Advance {advance_id} is paid by and to the same member {member_id}")]
    SelfAdvance {
        /// Advance ID
        advance_id: AdvanceId,
        /// Member on both sides
        member_id: MemberId,
    },

    /// Weighted split carrying a negative weight
    #[error("Negative weight {weight} for member {member_id} on expense {expense_id}")]
    NegativeWeight {
        /// Expense ID
        expense_id: ExpenseId,
        /// Member the weight belongs to
        member_id: MemberId,
        /// The rejected weight
        weight: Decimal,
    },

    /// Balances do not sum to zero within tolerance
    ///
    /// Indicates upstream corruption, e.g. an advance referencing a member
    /// that is not on the trip. Transfer suggestion refuses to proceed.
    #[error("Balances do not sum to zero: discrepancy {discrepancy} exceeds tolerance {tolerance}")]
    DataIntegrity {
        /// Sum of all balances
        discrepancy: Decimal,
        /// Tolerance that was exceeded
        tolerance: Decimal,
    },

    /// Mutation attempted on an archived trip
    #[error("Trip {trip_id} is closed")]
    TripClosed {
        /// Trip ID
        trip_id: TripId,
    },

    /// Malformed field while parsing an input record
    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

// Helper functions for creating common errors

impl SettlementError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(record: RecordRef, amount: Decimal) -> Self {
        SettlementError::InvalidAmount { record, amount }
    }

    /// Create a SelfAdvance error
    pub fn self_advance(advance_id: &str, member_id: &str) -> Self {
        SettlementError::SelfAdvance {
            advance_id: advance_id.to_string(),
            member_id: member_id.to_string(),
        }
    }

    /// Create a NegativeWeight error
    pub fn negative_weight(expense_id: &str, member_id: &str, weight: Decimal) -> Self {
        SettlementError::NegativeWeight {
            expense_id: expense_id.to_string(),
            member_id: member_id.to_string(),
            weight,
        }
    }

    /// Create a DataIntegrity error
    pub fn data_integrity(discrepancy: Decimal, tolerance: Decimal) -> Self {
        SettlementError::DataIntegrity {
            discrepancy,
            tolerance,
        }
    }

    /// Create a TripClosed error
    pub fn trip_closed(trip_id: &str) -> Self {
        SettlementError::TripClosed {
            trip_id: trip_id.to_string(),
        }
    }

    /// Create a ParseError without line information
    pub fn parse(message: impl Into<String>) -> Self {
        SettlementError::ParseError {
            line: None,
            message: message.into(),
        }
    }
}

/// Non-fatal data-quality problem found while settling
///
/// The affected expense or advance contributes less than expected (often
/// nothing); the caller decides whether to surface or just log it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataQualityWarning {
    /// No member is eligible to share the expense
    #[error("Expense {expense_id} has no eligible members; no shares allocated")]
    NoEligibleMembers { expense_id: ExpenseId },

    /// Weighted expense whose eligible weights sum to zero
    #[error("Expense {expense_id} has zero total weight among eligible members; no shares allocated")]
    ZeroTotalWeight { expense_id: ExpenseId },

    /// Weight map entry referencing a member that is not on the trip
    #[error("Expense {expense_id} weights unknown member {member_id}; weight ignored")]
    UnknownWeightMember {
        expense_id: ExpenseId,
        member_id: MemberId,
    },

    /// Payer or recipient that is not on the trip
    #[error("{record} references unknown member {member_id}; posting skipped")]
    UnknownMember {
        record: RecordRef,
        member_id: MemberId,
    },

    /// Posting whose amounts exceed what a `Decimal` can represent
    #[error("{record} overflows the representable amount range; posting skipped")]
    AmountOverflow { record: RecordRef },
}

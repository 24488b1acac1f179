//! Advance-related types for the trip settlement engine

use super::member::MemberId;
use super::trip::TripId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Advance identifier
pub type AdvanceId = String;

/// A direct transfer between two members outside the shared-expense pool
///
/// Pre-trip pooled funds or one member reimbursing another are both
/// recorded as advances.
#[derive(Debug, Clone, PartialEq)]
pub struct Advance {
    pub id: AdvanceId,
    pub trip_id: TripId,

    /// Positive amount in the trip currency
    pub amount: Decimal,

    pub description: String,

    /// Member who supplied the funds
    pub paid_by: MemberId,

    /// Member who received the funds (never equal to `paid_by`)
    pub paid_to: MemberId,

    pub created_at: DateTime<Utc>,
}

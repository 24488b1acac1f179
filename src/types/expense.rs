//! Expense-related types for the trip settlement engine
//!
//! This module defines the expense record together with the two optional
//! aspects of a stored expense that the engine must interpret: how the cost
//! is divided (`SplitMethod`) and who was eligible to share it when it was
//! created (`Eligibility`).

use super::member::MemberId;
use super::trip::TripId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Expense identifier
pub type ExpenseId = String;

/// One entry of a weight map
///
/// Weights are non-negative and not necessarily normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightEntry {
    pub member_id: MemberId,
    pub weight: Decimal,
}

impl WeightEntry {
    pub fn new(member_id: impl Into<MemberId>, weight: Decimal) -> Self {
        WeightEntry {
            member_id: member_id.into(),
            weight,
        }
    }
}

/// Rule governing how one expense is divided among eligible members
#[derive(Debug, Clone, PartialEq)]
pub enum SplitMethod {
    /// Every eligible member pays the same share
    Equal,

    /// Shares proportional to the listed weights
    ///
    /// Entries for members outside the eligible set are ignored, not erased.
    Weighted(Vec<WeightEntry>),
}

impl SplitMethod {
    /// Name of the split method as stored (`equal` or `weight`)
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitMethod::Equal => "equal",
            SplitMethod::Weighted(_) => "weight",
        }
    }
}

/// Set of members eligible to share one expense
#[derive(Debug, Clone, PartialEq)]
pub enum Eligibility {
    /// Expense predates membership snapshots: all active members share it
    Legacy,

    /// Member ids frozen when the expense was created
    ///
    /// An empty snapshot means nobody is eligible.
    Snapshot(Vec<MemberId>),
}

/// Expense category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Food,
    Transport,
    Lodging,
    Activity,
    Shopping,
    Other,
}

impl Category {
    /// Parse a category name, case-insensitively
    ///
    /// Unknown names fall into `Other` rather than failing.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "food" => Category::Food,
            "transport" => Category::Transport,
            "lodging" => Category::Lodging,
            "activity" => Category::Activity,
            "shopping" => Category::Shopping,
            _ => Category::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Transport => "transport",
            Category::Lodging => "lodging",
            Category::Activity => "activity",
            Category::Shopping => "shopping",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single cost entry attributed to the trip
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub trip_id: TripId,

    /// Positive amount in the trip currency
    pub amount: Decimal,

    pub description: String,
    pub category: Category,

    /// Member who fronted the money
    pub paid_by: MemberId,

    pub split: SplitMethod,
    pub eligibility: Eligibility,
    pub created_at: DateTime<Utc>,
}

//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `member`: Trip participants and their identifiers
//! - `expense`: Expenses, split methods and eligibility snapshots
//! - `advance`: Peer-to-peer advances outside the shared pool
//! - `settlement`: Derived per-member balances, shares and transfers
//! - `trip`: Trip currency and status
//! - `error`: Error and warning types for the settlement engine

pub mod advance;
pub mod error;
pub mod expense;
pub mod member;
pub mod settlement;
pub mod trip;

pub use advance::{Advance, AdvanceId};
pub use error::{DataQualityWarning, RecordRef, SettlementError};
pub use expense::{Category, Eligibility, Expense, ExpenseId, SplitMethod, WeightEntry};
pub use member::{Member, MemberId, MemberRole};
pub use settlement::{Settlement, Share, Transfer};
pub use trip::{minor_units_for, Trip, TripId, TripStatus};

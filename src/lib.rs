//! Trip Settlement Engine Library
//! # Overview
//!
//! This library computes, for a trip shared by several members, how much each
//! member paid and owes, and suggests a small set of transfers that settles
//! everyone. The core is a pure computation; a CSV harness with a sync and an
//! async loading strategy sits on top of it.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Member, Expense, Advance, Settlement, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::split_resolver`] - Who shares an expense and by how much
//!   - [`core::balance_accumulator`] - Per-member totals and balances
//!   - [`core::transfer_minimizer`] - Greedy transfer plan
//!   - [`core::engine`] - Validation and orchestration of a settlement run
//! - [`io`] - CSV input and output
//! - [`strategy`] - Pluggable loading strategies
//!
//! # Balances
//!
//! Each member's balance is
//! `total_paid + total_advances - total_expenses`:
//! positive means the member is owed money, negative means they owe money.
//! For consistent input the balances sum to zero.
//!
//! # Money
//!
//! Amounts are `rust_decimal::Decimal` values. Shares are exact: the last
//! eligible member absorbs the division remainder. Rounding to the trip's
//! minor unit only happens when amounts are written out.

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{
    compute_settlements, suggest_transfers, EngineConfig, SettlementEngine, SettlementReport,
};
pub use crate::io::{write_settlements_csv, write_transfers_csv};
pub use crate::types::{
    Advance, Category, DataQualityWarning, Eligibility, Expense, Member, MemberId, MemberRole,
    Settlement, SettlementError, Share, SplitMethod, Transfer, Trip, TripStatus, WeightEntry,
};

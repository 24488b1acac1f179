//! Core business logic module
//!
//! This module contains the settlement computation components:
//! - `split_resolver` - Expands one expense into per-member shares
//! - `balance_accumulator` - Folds expenses and advances into member balances
//! - `transfer_minimizer` - Greedy debt simplification into suggested transfers
//! - `validation` - Boundary checks that reject invalid records
//! - `engine` - Settlement run orchestration and configuration
//! - `summary` - Trip-level totals

pub mod balance_accumulator;
pub mod engine;
pub mod split_resolver;
pub mod summary;
pub mod transfer_minimizer;
pub mod validation;

pub use balance_accumulator::BalanceAccumulator;
pub use engine::{
    compute_settlements, suggest_transfers, EngineConfig, SettlementEngine, SettlementReport,
};
pub use split_resolver::{eligible_members, resolve_split, ResolvedSplit};
pub use summary::{summarize, TripSummary};
pub use transfer_minimizer::minimize_transfers;
pub use validation::{validate_advance, validate_expense};

//! Processing strategy module for settlement runs
//!
//! This module defines the Strategy pattern for complete settlement pipelines,
//! encompassing both loading the trip's CSV files and running the settlement
//! engine. Different loading implementations (synchronous, asynchronous batch)
//! can be selected at runtime; they all feed the same engine.

use crate::cli::StrategyType;
use crate::core::{EngineConfig, SettlementEngine};
use crate::io::csv_format::{write_settlements_csv, write_transfers_csv};
use crate::types::{Advance, Expense, Member};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncLoadingStrategy, LoadConfig};
pub use sync::SyncLoadingStrategy;

/// Input files of one trip
///
/// Expenses and advances are optional; a missing file means none.
#[derive(Debug, Clone, PartialEq)]
pub struct InputPaths {
    pub members: PathBuf,
    pub expenses: Option<PathBuf>,
    pub advances: Option<PathBuf>,
}

/// Records of one trip as loaded from its input files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripData {
    pub members: Vec<Member>,
    pub expenses: Vec<Expense>,
    pub advances: Vec<Advance>,
}

/// Options for a settlement run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOptions {
    pub engine: EngineConfig,
    /// Also write the suggested transfer plan
    pub transfers: bool,
}

/// Processing strategy trait for complete settlement pipelines
///
/// Implementations only decide how the input files are read. Computing and
/// writing the settlement is shared, so every strategy produces identical
/// output for the same input.
pub trait ProcessingStrategy: Send + Sync {
    /// Load every record of the trip
    ///
    /// # Errors
    ///
    /// Returns an error if an input file cannot be opened or read. Individual
    /// malformed records are logged and skipped.
    fn load(&self, inputs: &InputPaths) -> Result<TripData, String>;

    /// Load the trip, settle it and write the results to output
    ///
    /// Writes the settlements table and, when `options.transfers` is set, a
    /// blank line followed by the transfers table.
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the run completed (rejected records and data-quality
    ///   warnings are logged, not fatal)
    /// * `Err(String)` if loading failed, output could not be written, or
    ///   the balances do not sum to zero when transfers were requested
    fn process(
        &self,
        inputs: &InputPaths,
        options: &RunOptions,
        output: &mut dyn Write,
    ) -> Result<(), String> {
        let data = self.load(inputs)?;
        info!(
            members = data.members.len(),
            expenses = data.expenses.len(),
            advances = data.advances.len(),
            "trip loaded"
        );

        let engine = SettlementEngine::new(options.engine.clone());
        let minor_units = engine.config().minor_units;
        let report = engine.compute_settlements(&data.expenses, &data.advances, &data.members);

        write_settlements_csv(&report.settlements, minor_units, output)?;

        if options.transfers {
            let transfers = engine.suggest_transfers(&report.settlements).map_err(|e| {
                error!("Cannot suggest transfers: {}", e);
                e.to_string()
            })?;

            writeln!(output).map_err(|e| format!("Failed to write output: {}", e))?;
            write_transfers_csv(&transfers, minor_units, output)?;
        }

        Ok(())
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of loading strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch loading (ignored for sync)
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<LoadConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncLoadingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncLoadingStrategy::new(config))
        }
    }
}

use crate::core::EngineConfig;
use crate::strategy::{InputPaths, LoadConfig, RunOptions};
use crate::types::Trip;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Settle a trip's shared expenses and advances
#[derive(Parser, Debug)]
#[command(name = "trip-settle")]
#[command(about = "Compute per-member trip balances and suggest who pays whom", long_about = None)]
pub struct CliArgs {
    /// Members CSV file path
    #[arg(long = "members", value_name = "FILE", help = "Path to the members CSV file")]
    pub members: PathBuf,

    /// Expenses CSV file path
    #[arg(
        long = "expenses",
        value_name = "FILE",
        help = "Path to the expenses CSV file (omit for none)"
    )]
    pub expenses: Option<PathBuf>,

    /// Advances CSV file path
    #[arg(
        long = "advances",
        value_name = "FILE",
        help = "Path to the advances CSV file (omit for none)"
    )]
    pub advances: Option<PathBuf>,

    /// Loading strategy to use for reading the input files
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Loading strategy: 'sync' for synchronous or 'async' for asynchronous"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of runtime worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of runtime worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    #[arg(
        long = "currency",
        value_name = "CODE",
        default_value = "USD",
        help = "ISO 4217 currency code of the trip"
    )]
    pub currency: String,

    #[arg(
        long = "minor-units",
        value_name = "DIGITS",
        help = "Decimal places used for output amounts (default: from the currency)"
    )]
    pub minor_units: Option<u32>,

    #[arg(
        long = "tolerance",
        value_name = "AMOUNT",
        help = "Largest balance sum still treated as zero (default: 0.01)"
    )]
    pub tolerance: Option<Decimal>,

    #[arg(long = "transfers", help = "Also print the suggested transfer plan")]
    pub transfers: bool,
}

/// Available loading strategies for CSV processing
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a LoadConfig from CLI arguments
    ///
    /// Falls back to default values for anything not provided; invalid values
    /// are reported as warnings by `LoadConfig::new`.
    pub fn to_load_config(&self) -> LoadConfig {
        if self.batch_size.is_some() || self.worker_threads.is_some() {
            let default = LoadConfig::default();
            LoadConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.worker_threads.unwrap_or(default.worker_threads),
            )
        } else {
            LoadConfig::default()
        }
    }

    /// Trip described by the currency arguments
    pub fn to_trip(&self) -> Trip {
        let mut trip = Trip::with_currency("trip", self.currency.as_str());
        if let Some(minor_units) = self.minor_units {
            trip.minor_units = minor_units;
        }
        trip
    }

    /// Create an EngineConfig from CLI arguments
    pub fn to_engine_config(&self) -> EngineConfig {
        let trip_config = EngineConfig::for_trip(&self.to_trip());
        match self.tolerance {
            Some(tolerance) => EngineConfig::new(tolerance, trip_config.minor_units),
            None => trip_config,
        }
    }

    pub fn to_run_options(&self) -> RunOptions {
        RunOptions {
            engine: self.to_engine_config(),
            transfers: self.transfers,
        }
    }

    pub fn to_input_paths(&self) -> InputPaths {
        InputPaths {
            members: self.members.clone(),
            expenses: self.expenses.clone(),
            advances: self.advances.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // Strategy parsing tests
    #[rstest]
    #[case::default_strategy(&["program", "--members", "m.csv"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "--members", "m.csv"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "--members", "m.csv"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[test]
    fn test_input_paths() {
        let parsed = CliArgs::try_parse_from([
            "program",
            "--members",
            "m.csv",
            "--expenses",
            "e.csv",
        ])
        .unwrap();

        let inputs = parsed.to_input_paths();
        assert_eq!(inputs.members, PathBuf::from("m.csv"));
        assert_eq!(inputs.expenses, Some(PathBuf::from("e.csv")));
        assert_eq!(inputs.advances, None);
    }

    // LoadConfig conversion tests
    #[rstest]
    #[case::all_defaults(&["program", "--members", "m.csv"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000", "--members", "m.csv"], 2000, num_cpus::get())]
    #[case::custom_workers(&["program", "--worker-threads", "8", "--members", "m.csv"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0", "--members", "m.csv"], 1000, num_cpus::get())]
    #[case::zero_workers(&["program", "--worker-threads", "0", "--members", "m.csv"], 1000, num_cpus::get())]
    fn test_load_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_workers: usize,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_load_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.worker_threads, expected_workers);
    }

    // EngineConfig conversion tests
    #[rstest]
    #[case::defaults(&["program", "--members", "m.csv"], "0.01", 2)]
    #[case::zero_decimal_currency(&["program", "--currency", "VND", "--members", "m.csv"], "0.01", 0)]
    #[case::explicit_minor_units(&["program", "--currency", "VND", "--minor-units", "3", "--members", "m.csv"], "0.01", 3)]
    #[case::custom_tolerance(&["program", "--tolerance", "0.5", "--members", "m.csv"], "0.5", 2)]
    #[case::negative_tolerance(&["program", "--tolerance=-1", "--members", "m.csv"], "0.01", 2)]
    fn test_engine_config_conversion(
        #[case] args: &[&str],
        #[case] expected_tolerance: &str,
        #[case] expected_minor_units: u32,
    ) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        let config = parsed.to_engine_config();

        assert_eq!(config.tolerance, expected_tolerance.parse::<Decimal>().unwrap());
        assert_eq!(config.minor_units, expected_minor_units);
    }

    #[test]
    fn test_transfers_flag() {
        let parsed = CliArgs::try_parse_from(["program", "--members", "m.csv"]).unwrap();
        assert!(!parsed.to_run_options().transfers);

        let parsed =
            CliArgs::try_parse_from(["program", "--members", "m.csv", "--transfers"]).unwrap();
        assert!(parsed.to_run_options().transfers);
    }

    // Error handling tests
    #[rstest]
    #[case::missing_members(&["program"])]
    #[case::invalid_strategy(&["program", "--strategy", "invalid", "--members", "m.csv"])]
    #[case::invalid_tolerance(&["program", "--tolerance", "abc", "--members", "m.csv"])]
    #[case::negative_minor_units(&["program", "--minor-units=-2", "--members", "m.csv"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        let result = CliArgs::try_parse_from(args);
        assert!(result.is_err());
    }
}

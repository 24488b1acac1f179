//! Trip Settlement Engine CLI
//!
//! Command-line interface for settling a trip from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --members members.csv --expenses expenses.csv > settlements.csv
//! cargo run -- --members members.csv --expenses expenses.csv --advances advances.csv --transfers
//! cargo run -- --strategy async --batch-size 2000 --worker-threads 4 --members members.csv --expenses expenses.csv
//! cargo run -- --currency VND --members members.csv --expenses expenses.csv --transfers
//! ```
//!
//! The program loads the trip's records with the selected strategy, computes
//! every member's balance, and writes the settlements (and optionally the
//! suggested transfers) as CSV to stdout. Diagnostics go to stderr; set
//! `RUST_LOG` (e.g. `RUST_LOG=debug`) to see more of them.
//!
//! # Loading Strategies
//!
//! - **sync**: Synchronous CSV parsing, one file after another (default)
//! - **async**: Asynchronous batch parsing, all files concurrently
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, unbalanced trip when transfers were requested, etc.)

use std::process;
use tracing_subscriber::EnvFilter;
use trip_settlement_engine::cli;
use trip_settlement_engine::strategy;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    // Create the appropriate loading strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_load_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.to_input_paths(), &args.to_run_options(), &mut output)
    {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

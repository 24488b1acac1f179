//! Asynchronous batch loading strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. The trip's input files are read concurrently on a
//! tokio runtime, each one in batches through an `AsyncReader`.
//!
//! # Architecture
//!
//! ```text
//! AsyncLoadingStrategy
//!     ├── LoadConfig (batch_size, worker_threads)
//!     ├── AsyncReader<CsvMember>  ─┐
//!     ├── AsyncReader<CsvExpense> ─┼─ try_join! → TripData → SettlementEngine
//!     └── AsyncReader<CsvAdvance> ─┘
//! ```
//!
//! Records keep their file order, so the settlement is identical to the one
//! produced by the synchronous strategy.

use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::{CsvAdvance, CsvExpense, CsvMember, CsvRow};
use crate::strategy::{InputPaths, ProcessingStrategy, TripData};
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, warn};

/// Configuration for batch loading
///
/// Controls how many records are parsed per batch and the number of worker
/// threads of the runtime.
#[derive(Clone, Debug, PartialEq)]
pub struct LoadConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Number of tokio worker threads
    pub worker_threads: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl LoadConfig {
    /// Create a new LoadConfig with custom values
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size, default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                "Invalid worker_threads ({}), using default ({})",
                worker_threads, default.worker_threads
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch loading strategy
///
/// # Configuration
///
/// The strategy accepts a LoadConfig with:
/// - `batch_size`: Number of records per batch (default: 1000)
/// - `worker_threads`: Number of worker threads (default: CPU cores)
#[derive(Debug, Clone)]
pub struct AsyncLoadingStrategy {
    config: LoadConfig,
}

impl AsyncLoadingStrategy {
    pub fn new(config: LoadConfig) -> Self {
        Self { config }
    }
}

/// Read every valid record of one file in batches
async fn read_file<Row>(path: &Path, batch_size: usize) -> Result<Vec<Row::Record>, String>
where
    Row: CsvRow + Send + 'static,
{
    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

    // Wrap tokio file in a compatibility layer for csv-async
    let mut reader = AsyncReader::<_, Row>::new(file.compat());

    let mut records = Vec::new();
    loop {
        let batch = reader.read_batch(batch_size).await;
        if batch.is_empty() {
            break;
        }
        debug!(file = %path.display(), records = batch.len(), "batch read");
        records.extend(batch);
    }

    Ok(records)
}

/// Read an optional file; a missing path yields no records
async fn read_optional<Row>(
    path: Option<&Path>,
    batch_size: usize,
) -> Result<Vec<Row::Record>, String>
where
    Row: CsvRow + Send + 'static,
{
    match path {
        Some(path) => read_file::<Row>(path, batch_size).await,
        None => Ok(Vec::new()),
    }
}

impl ProcessingStrategy for AsyncLoadingStrategy {
    /// Load the three input files concurrently
    ///
    /// Fatal errors (file not found, runtime errors) are returned; the first
    /// one wins. Individual record errors are logged and loading continues.
    fn load(&self, inputs: &InputPaths) -> Result<TripData, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        let batch_size = self.config.batch_size;

        runtime.block_on(async {
            let (members, expenses, advances) = futures::try_join!(
                read_file::<CsvMember>(&inputs.members, batch_size),
                read_optional::<CsvExpense>(inputs.expenses.as_deref(), batch_size),
                read_optional::<CsvAdvance>(inputs.advances.as_deref(), batch_size)
            )?;

            Ok(TripData {
                members,
                expenses,
                advances,
            })
        })
    }
}

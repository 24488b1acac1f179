//! Synchronous loading strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. Each input file is streamed through a
//! `SyncReader` one record at a time, in file order.
//!
//! # Thread Safety
//!
//! While this strategy is single-threaded, it implements Send + Sync to be
//! compatible with the ProcessingStrategy trait.

use crate::io::csv_format::{CsvAdvance, CsvExpense, CsvMember, CsvRow};
use crate::io::sync_reader::SyncReader;
use crate::strategy::{InputPaths, ProcessingStrategy, TripData};
use std::path::Path;
use tracing::warn;

/// Synchronous loading strategy
///
/// # Examples
///
/// ```no_run
/// use trip_settlement_engine::strategy::{
///     InputPaths, ProcessingStrategy, RunOptions, SyncLoadingStrategy,
/// };
/// use std::path::PathBuf;
/// use std::io;
///
/// let inputs = InputPaths {
///     members: PathBuf::from("members.csv"),
///     expenses: Some(PathBuf::from("expenses.csv")),
///     advances: None,
/// };
///
/// SyncLoadingStrategy
///     .process(&inputs, &RunOptions::default(), &mut io::stdout())
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SyncLoadingStrategy;

/// Read every valid record of one file, logging the rest
fn read_file<Row: CsvRow>(path: &Path) -> Result<Vec<Row::Record>, String> {
    let reader = SyncReader::<Row>::new(path)?;
    let mut records = Vec::new();

    for result in reader {
        match result {
            Ok(record) => records.push(record),
            Err(e) => warn!("CSV parsing error in '{}': {}", path.display(), e),
        }
    }

    Ok(records)
}

/// Read an optional file; a missing path yields no records
fn read_optional<Row: CsvRow>(path: Option<&Path>) -> Result<Vec<Row::Record>, String> {
    match path {
        Some(path) => read_file::<Row>(path),
        None => Ok(Vec::new()),
    }
}

impl ProcessingStrategy for SyncLoadingStrategy {
    /// Load members, then expenses, then advances
    ///
    /// Fatal errors (file not found, I/O errors) are returned immediately.
    /// Individual record errors are logged and loading continues.
    fn load(&self, inputs: &InputPaths) -> Result<TripData, String> {
        Ok(TripData {
            members: read_file::<CsvMember>(&inputs.members)?,
            expenses: read_optional::<CsvExpense>(inputs.expenses.as_deref())?,
            advances: read_optional::<CsvAdvance>(inputs.advances.as_deref())?,
        })
    }
}

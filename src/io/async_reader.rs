//! Asynchronous CSV reader with batch interface
//!
//! Provides a streaming interface over trip records from any async source.
//! Supports batch reading so large expense logs never need to be parsed in
//! one go.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader<Row> → Batches of domain records
//!                  ↓
//!           csv_format module
//!           (CsvRow::convert)
//! ```

use crate::io::csv_format::CsvRow;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use std::marker::PhantomData;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Invalid records are logged and skipped; only converted records are
/// returned.
pub struct AsyncReader<R: AsyncRead + Unpin, Row: CsvRow> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    _row: PhantomData<Row>,
}

impl<R, Row> AsyncReader<R, Row>
where
    R: AsyncRead + Unpin + Send + 'static,
    Row: CsvRow + Send + 'static,
{
    /// Create a new AsyncReader from an async reader
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            _row: PhantomData,
        }
    }

    /// Read a batch of records
    ///
    /// Reads up to `batch_size` rows. Rows that fail to parse or convert are
    /// logged and do not count towards the batch.
    ///
    /// # Returns
    ///
    /// The converted records. An empty vector means the end of the input.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<Row::Record> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<Row>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(row)) => match row.convert() {
                    Ok(record) => batch.push(record),
                    Err(e) => warn!("Record conversion error: {}", e),
                },
                Some(Err(e)) => warn!("CSV parse error: {}", e),
                None => break,
            }
        }

        batch
    }

    /// Read every remaining record, `batch_size` rows at a time
    pub async fn read_all(&mut self, batch_size: usize) -> Vec<Row::Record> {
        let mut all = Vec::new();
        loop {
            let batch = self.read_batch(batch_size.max(1)).await;
            if batch.is_empty() {
                break;
            }
            all.extend(batch);
        }
        all
    }
}

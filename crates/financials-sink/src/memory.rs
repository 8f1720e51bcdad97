//! In-memory sink implementation.

use async_trait::async_trait;
use financials_core::{Accession, FilingRecord, HistoryRecord, RecordSink, Result};
use polars::prelude::DataFrame;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::frame::{history_frame, records_frame};

/// Sink that keeps everything in memory.
///
/// Records are kept in first-write order; rewriting an accession replaces
/// its record in place and drops its earlier history. Contents are lost when
/// the sink is dropped.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: RwLock<Vec<FilingRecord>>,
    history: RwLock<Vec<HistoryRecord>>,
}

impl MemorySink {
    /// Create a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the stored records.
    pub async fn records(&self) -> Vec<FilingRecord> {
        self.records.read().await.clone()
    }

    /// Record stored for `accession`, if any.
    pub async fn record(&self, accession: &Accession) -> Option<FilingRecord> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| &r.accession == accession)
            .cloned()
    }

    /// Snapshot of the history stream.
    pub async fn history(&self) -> Vec<HistoryRecord> {
        self.history.read().await.clone()
    }

    /// Stored records as a DataFrame.
    pub async fn records_frame(&self) -> Result<DataFrame> {
        records_frame(&self.records.read().await)
    }

    /// History stream as a DataFrame.
    pub async fn history_frame(&self) -> Result<DataFrame> {
        history_frame(&self.history.read().await)
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    #[instrument(skip(self, record), fields(accession = %record.accession))]
    async fn write_record(&self, record: &FilingRecord) -> Result<()> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.accession == record.accession) {
            Some(existing) => {
                debug!("Replacing stored record");
                *existing = record.clone();
            }
            None => records.push(record.clone()),
        }
        Ok(())
    }

    #[instrument(skip(self, accession, history), fields(accession = %accession, count = history.len()))]
    async fn write_history(
        &self,
        accession: &Accession,
        history: &[HistoryRecord],
    ) -> Result<()> {
        let mut stored = self.history.write().await;
        stored.retain(|h| &h.accession != accession);
        stored.extend_from_slice(history);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.records.write().await.clear();
        self.history.write().await.clear();
        debug!("Memory sink cleared");
        Ok(())
    }
}

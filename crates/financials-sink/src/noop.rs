//! No-op sink implementation.

use async_trait::async_trait;
use financials_core::{Accession, FilingRecord, HistoryRecord, RecordSink, Result};
use tracing::trace;

/// A sink that discards everything written to it.
///
/// Useful for dry runs and for exercising extraction without storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl NoopSink {
    /// Create a new no-op sink.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RecordSink for NoopSink {
    async fn write_record(&self, record: &FilingRecord) -> Result<()> {
        trace!(accession = %record.accession, "NoopSink: discarding record");
        Ok(())
    }

    async fn write_history(
        &self,
        accession: &Accession,
        history: &[HistoryRecord],
    ) -> Result<()> {
        trace!(accession = %accession, count = history.len(), "NoopSink: discarding history");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }
}

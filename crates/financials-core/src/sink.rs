//! Output sink for resolved filings.
//!
//! This module defines the [`RecordSink`] trait that receives one
//! [`FilingRecord`] per processed filing and the [`HistoryRecord`] stream of
//! superseded candidate values. A sink instance corresponds to one reporting
//! quarter's output.

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Accession, FilingRecord, HistoryRecord},
};

/// Destination for extraction output.
///
/// Implementations can write to various backends (SQLite, in-memory, etc.).
/// Records and history are both keyed by accession, so writing a filing
/// again replaces what was stored for it.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Stores the resolved record of one filing, replacing any earlier record
    /// with the same accession.
    async fn write_record(&self, record: &FilingRecord) -> Result<()>;

    /// Replaces the history stored for `accession` with `history`, kept in
    /// the given order. An empty slice removes that accession's history.
    async fn write_history(
        &self,
        accession: &Accession,
        history: &[HistoryRecord],
    ) -> Result<()>;

    /// Removes everything written so far.
    async fn clear(&self) -> Result<()>;
}

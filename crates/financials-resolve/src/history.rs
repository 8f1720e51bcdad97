//! Recorder for candidate values passed over during period selection.

use chrono::NaiveDate;
use financials_core::{Accession, Field, HistoryRecord};

/// Append-only buffer of [`HistoryRecord`]s for one filing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct History {
    records: Vec<HistoryRecord>,
}

impl History {
    /// Creates an empty recorder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Appends one superseded value.
    pub fn record(
        &mut self,
        accession: &Accession,
        field: Field,
        element: &str,
        date: NaiveDate,
        value: &str,
    ) {
        self.records.push(HistoryRecord {
            accession: accession.clone(),
            field,
            element: element.to_string(),
            date,
            value: value.to_string(),
        });
    }

    /// Records appended so far, in order.
    #[must_use]
    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consumes the recorder and returns the records.
    #[must_use]
    pub fn into_records(self) -> Vec<HistoryRecord> {
        self.records
    }
}

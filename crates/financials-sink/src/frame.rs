//! DataFrame export of sink contents.

use financials_core::{FilingRecord, FinancialsError, HistoryRecord, Result};
use polars::prelude::{Column, DataFrame};

/// One row per record, columns in [`FilingRecord::columns`] order.
///
/// Every column is a nullable string column; unresolved fields are null.
///
/// # Errors
/// Returns [`FinancialsError::Sink`] if the frame cannot be assembled.
pub fn records_frame(records: &[FilingRecord]) -> Result<DataFrame> {
    let rows: Vec<Vec<Option<String>>> = records.iter().map(FilingRecord::row).collect();
    let columns = FilingRecord::columns()
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<Option<String>> = rows.iter().map(|row| row[i].clone()).collect();
            Column::new(name.into(), values)
        })
        .collect();

    DataFrame::new(columns).map_err(|e| FinancialsError::Sink(e.to_string()))
}

/// One row per history record with a typed `date` column, in
/// [`HISTORY_COLUMNS`](financials_core::HISTORY_COLUMNS) order.
///
/// # Errors
/// Returns [`FinancialsError::Sink`] if the frame cannot be assembled.
pub fn history_frame(history: &[HistoryRecord]) -> Result<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            "accession".into(),
            history
                .iter()
                .map(|h| h.accession.to_string())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "field".into(),
            history
                .iter()
                .map(|h| h.field.key())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "element".into(),
            history
                .iter()
                .map(|h| h.element.as_str())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "date".into(),
            history.iter().map(|h| h.date).collect::<Vec<_>>(),
        ),
        Column::new(
            "value".into(),
            history
                .iter()
                .map(|h| h.value.as_str())
                .collect::<Vec<_>>(),
        ),
    ])
    .map_err(|e| FinancialsError::Sink(e.to_string()))
}

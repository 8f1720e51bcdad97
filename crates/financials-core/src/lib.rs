#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/financials/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for XBRL financial statement extraction.
//!
//! This crate provides the shared vocabulary of the workspace:
//!
//! - [`Field`](field::Field) - Canonical financial statement fields
//! - [`Filing`](types::Filing) / [`FilingRecord`](types::FilingRecord) - Input and output of one filing
//! - [`HistoryRecord`](types::HistoryRecord) - Superseded candidate values
//! - [`FilingSource`](source::FilingSource) - Document fetch capability
//! - [`RecordSink`](sink::RecordSink) - Output sink abstraction

/// Error types for extraction.
pub mod error;
/// Canonical financial statement fields.
pub mod field;
/// Period type and index quarter definitions.
pub mod period;
/// Output sink trait.
pub mod sink;
/// Document source trait.
pub mod source;
/// Core data types (Accession, Filing, FilingRecord, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{FinancialsError, Result};
pub use field::{Field, Statement};
pub use period::{PeriodType, Quarter};
pub use sink::RecordSink;
pub use source::FilingSource;
pub use types::{
    Accession, Filing, FilingRecord, HISTORY_COLUMNS, HistoryRecord, METADATA_COLUMNS,
    PERIODIC_FORMS,
};

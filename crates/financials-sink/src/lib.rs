#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/financials/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Output sinks for extracted filings.
//!
//! This crate provides implementations of the [`RecordSink`] trait from `financials-core`:
//!
//! - [`SqliteSink`] - Persistent SQLite-based sink (default, requires `sqlite` feature)
//! - [`MemorySink`] - Simple in-memory sink for testing
//! - [`NoopSink`] - No-op sink that doesn't store anything
//!
//! Stored records and history can be exported as polars DataFrames.

/// DataFrame export helpers.
pub mod frame;
/// In-memory sink implementation.
pub mod memory;
/// No-op sink implementation.
pub mod noop;

/// SQLite-based sink implementation.
#[cfg(feature = "sqlite")]
pub mod sqlite;

// Re-export the trait for convenience
pub use financials_core::RecordSink;

// Re-export implementations
pub use frame::{history_frame, records_frame};
pub use memory::MemorySink;
pub use noop::NoopSink;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;

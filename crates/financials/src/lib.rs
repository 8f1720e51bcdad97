#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/financials/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Standardized financial statements from XBRL filings.
//!
//! This crate re-exports the workspace's core types, the resolution engine,
//! the sinks and (optionally) the EDGAR source, and provides a
//! [`FilingProcessor`] that runs filings through all of them.
//!
//! # Features
//!
//! - `edgar` - SEC EDGAR filing source
//! - `sink-sqlite` - SQLite-based sink
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use financials::{EdgarClient, FilingProcessor, Quarter, SqliteSink};
//!
//! #[tokio::main]
//! async fn main() -> financials::Result<()> {
//!     let edgar = Arc::new(EdgarClient::new("MyApp/1.0 (contact@example.com)")?);
//!     let sink = Arc::new(SqliteSink::new("2019Q4.db")?);
//!     let processor = FilingProcessor::new(edgar.clone(), sink);
//!
//!     let filings = edgar.quarter_index("2019/QTR4".parse::<Quarter>()?).await?;
//!     let summary = processor.process_all(&filings).await;
//!     println!("{} filings processed", summary.processed);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use financials_core::*;

// Resolution engine
pub use financials_resolve::{
    EntityScope, Extraction, FieldSpec, FilingDocument, FilingScope, History, MappingTable, Rule,
    extract,
};

// Sink implementations
#[cfg(feature = "sink-sqlite")]
pub use financials_sink::SqliteSink;
pub use financials_sink::{MemorySink, NoopSink};

// Sources
#[cfg(feature = "edgar")]
pub use financials_edgar::EdgarClient;

mod processor;
pub use processor::{FilingProcessor, ProcessFailure, ProcessSummary};

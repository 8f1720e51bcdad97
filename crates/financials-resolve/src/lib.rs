#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/financials/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! XBRL element resolution and period selection.
//!
//! ```no_run
//! use financials_core::Filing;
//! use financials_resolve::{FilingDocument, MappingTable, extract};
//!
//! # fn run(xml: &str, filing: &Filing) -> financials_core::Result<()> {
//! let document = FilingDocument::parse(xml)?;
//! let extraction = extract(&document, filing, &MappingTable::standard());
//! println!("{:?}", extraction.record.row());
//! # Ok(())
//! # }
//! ```

/// Arithmetic on textual amounts.
pub mod amount;
/// Context index builder.
pub mod context;
/// Instance document parsing.
pub mod document;
/// Legal entity scoping.
pub mod entity;
/// Per-filing extraction.
pub mod extract;
/// Superseded candidate recorder.
pub mod history;
/// Canonical field mapping table.
pub mod mapping;
/// Fact resolver.
pub mod resolver;

#[cfg(test)]
mod testing;

pub use context::{ContextIndex, ContextRecord, ContextValue};
pub use document::{Fact, FactIndex, FilingDocument, parse_xml};
pub use entity::{EntityScope, LEGAL_ENTITY_AXIS, REGISTRANT_ELEMENT};
pub use extract::{Extraction, extract, ticker_from_instance_name};
pub use history::History;
pub use mapping::{FieldSpec, MappingTable, Rule};
pub use resolver::FilingScope;

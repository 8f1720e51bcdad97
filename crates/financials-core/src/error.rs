//! Error types for filing extraction.
//!
//! This module defines [`FinancialsError`] which covers the faults that can end
//! the processing of a filing: fetching, parsing, configuration and output.
//! Missing data is never an error; resolution reports it as `None`.

use thiserror::Error;

/// Errors that can occur while fetching, parsing or writing filing data.
#[derive(Error, Debug)]
pub enum FinancialsError {
    /// Network-related errors (connection failures, timeouts, HTTP status).
    #[error("Network error: {0}")]
    Network(String),

    /// A document or payload could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The filing index lists no XBRL instance document.
    #[error("No XBRL instance document found for accession {0}")]
    DocumentNotFound(String),

    /// A line of a quarterly filing index could not be split into its columns.
    #[error("Invalid index line: {0}")]
    InvalidIndexLine(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The field mapping table is inconsistent.
    #[error("Invalid mapping table: {0}")]
    Config(String),

    /// Error writing to an output sink.
    #[error("Sink error: {0}")]
    Sink(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`FinancialsError`].
pub type Result<T> = std::result::Result<T, FinancialsError>;

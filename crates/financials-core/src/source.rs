//! Document fetch capability.
//!
//! [`FilingSource`] is the boundary between the resolution engine and whatever
//! retrieves filing documents (HTTP, local mirror, test fixture). Transport and
//! lookup faults surface here as errors and end the processing of that filing.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::Result, types::Filing};

/// Source of XBRL instance documents.
#[async_trait]
pub trait FilingSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "SEC EDGAR").
    fn name(&self) -> &str;

    /// Finds the locator of the filing's XBRL instance document.
    ///
    /// # Errors
    /// Returns [`DocumentNotFound`](crate::FinancialsError::DocumentNotFound)
    /// if the filing carries no instance document, or a transport error.
    async fn locate_instance(&self, filing: &Filing) -> Result<String>;

    /// Fetches the raw text of the document at `locator`.
    async fn fetch_document(&self, locator: &str) -> Result<String>;
}

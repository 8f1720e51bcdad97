#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/financials/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR filing source.
//!
//! This crate provides access to SEC EDGAR archives:
//!
//! - Quarterly XBRL filing indexes (`full-index/YYYY/QTRn/xbrl.idx`)
//! - Filing directory listings, to locate the XBRL instance document
//! - Raw instance document retrieval
//!
//! # Example
//!
//! ```no_run
//! use financials_core::{FilingSource, Quarter};
//! use financials_edgar::EdgarClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = EdgarClient::new("MyApp/1.0 (contact@example.com)")?;
//!
//!     let quarter: Quarter = "2019/QTR4".parse()?;
//!     let filings = client.quarter_index(quarter).await?;
//!     if let Some(filing) = filings.first() {
//!         let locator = client.locate_instance(filing).await?;
//!         let xml = client.fetch_document(&locator).await?;
//!         println!("{}: {} bytes", filing.accession, xml.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod index;

pub use index::{parse_quarter_index, select_instance};

use async_trait::async_trait;
use financials_core::{Filing, FilingSource, FinancialsError, Quarter, Result};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::debug;

/// SEC EDGAR archives base URL
const ARCHIVES_BASE_URL: &str = "https://www.sec.gov/Archives/edgar";

/// Default rate limit: 10 requests per second (SEC requirement)
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Rate limiter to ensure we don't exceed SEC's rate limits
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// SEC EDGAR archive client.
///
/// Implements [`FilingSource`] over HTTP with rate limiting per SEC
/// requirements (max 10 requests/second).
#[derive(Debug)]
pub struct EdgarClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    archives_url: String,
}

impl EdgarClient {
    /// Create a new EDGAR client with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    ///
    /// # Errors
    /// Returns [`FinancialsError::Network`] if the HTTP client cannot be built.
    ///
    /// # Example
    /// ```
    /// use financials_edgar::EdgarClient;
    ///
    /// let client = EdgarClient::new("MyApp/1.0 (contact@example.com)").unwrap();
    /// ```
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(|e| FinancialsError::Network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client))
    }

    /// Create a new EDGAR client with a custom HTTP client.
    ///
    /// The client is expected to carry its own user agent and timeout.
    ///
    /// # Example
    /// ```
    /// use financials_edgar::EdgarClient;
    /// use std::time::Duration;
    ///
    /// let client = reqwest::Client::builder()
    ///     .timeout(Duration::from_secs(60))
    ///     .user_agent("MyApp/1.0 (contact@example.com)")
    ///     .build()
    ///     .unwrap();
    ///
    /// let edgar = EdgarClient::with_client(client);
    /// ```
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            archives_url: ARCHIVES_BASE_URL.to_string(),
        }
    }

    /// Use a different archives root, e.g. a local mirror.
    #[must_use]
    pub fn with_archives_url(mut self, url: impl Into<String>) -> Self {
        self.archives_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the minimum interval between requests.
    #[must_use]
    pub fn with_rate_limit(mut self, min_interval: Duration) -> Self {
        self.rate_limiter = Arc::new(Mutex::new(RateLimiter::new(min_interval)));
        self
    }

    /// Archives root used to build URLs.
    pub fn archives_url(&self) -> &str {
        &self.archives_url
    }

    /// URL of the XBRL filing index of `quarter`.
    pub fn quarter_index_url(&self, quarter: Quarter) -> String {
        format!(
            "{}/full-index/{}/xbrl.idx",
            self.archives_url,
            quarter.index_path()
        )
    }

    /// Directory of one filing's documents.
    pub fn filing_directory_url(&self, filing: &Filing) -> String {
        format!(
            "{}/data/{}/{}",
            self.archives_url,
            filing.cik.trim_start_matches('0'),
            filing.accession.compact()
        )
    }

    /// Fetch the periodic-report filings listed in a quarter's XBRL index.
    ///
    /// Only forms in [`PERIODIC_FORMS`](financials_core::PERIODIC_FORMS) are
    /// returned. Lines that cannot be parsed are logged and skipped.
    pub async fn quarter_index(&self, quarter: Quarter) -> Result<Vec<Filing>> {
        let url = self.quarter_index_url(quarter);
        let text = self.get_text(&url).await?;
        let filings = parse_quarter_index(&text);
        debug!(quarter = %quarter, filings = filings.len(), "Fetched quarter index");
        Ok(filings)
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        response
            .text()
            .await
            .map_err(|e| FinancialsError::Network(format!("Failed to read {}: {}", url, e)))
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        // Rate limit
        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FinancialsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FinancialsError::Network(format!(
                "Failed to fetch {}: HTTP {}",
                url,
                response.status()
            )));
        }
        Ok(response)
    }
}

#[async_trait]
impl FilingSource for EdgarClient {
    fn name(&self) -> &str {
        "SEC EDGAR"
    }

    async fn locate_instance(&self, filing: &Filing) -> Result<String> {
        let directory = self.filing_directory_url(filing);
        let url = format!("{}/index.json", directory);

        let listing: DirectoryListing = self
            .get(&url)
            .await?
            .json()
            .await
            .map_err(|e| FinancialsError::Parse(format!("Failed to parse filing index: {}", e)))?;

        let names: Vec<String> = listing
            .directory
            .item
            .into_iter()
            .map(|item| item.name)
            .collect();
        let instance = select_instance(&names)
            .ok_or_else(|| FinancialsError::DocumentNotFound(filing.accession.to_string()))?;

        debug!(accession = %filing.accession, instance, "Located instance document");
        Ok(format!("{}/{}", directory, instance))
    }

    async fn fetch_document(&self, locator: &str) -> Result<String> {
        self.get_text(locator).await
    }
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Filing directory listing (`index.json`).
#[derive(Debug, Deserialize)]
struct DirectoryListing {
    directory: Directory,
}

#[derive(Debug, Deserialize)]
struct Directory {
    #[serde(default)]
    item: Vec<DirectoryItem>,
}

/// One file in a filing directory.
#[derive(Debug, Deserialize)]
struct DirectoryItem {
    name: String,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use financials_core::Accession;

    fn filing() -> Filing {
        Filing::new(
            "0000320193",
            "Apple Inc.",
            "10-K",
            NaiveDate::from_ymd_opt(2019, 10, 31).unwrap(),
            Accession::new("0000320193-19-000119"),
        )
    }

    #[test]
    fn test_client_name() {
        let client = EdgarClient::new("Test/1.0 (test@example.com)").unwrap();
        assert_eq!(client.name(), "SEC EDGAR");
        assert_eq!(client.archives_url(), ARCHIVES_BASE_URL);
    }

    #[test]
    fn test_urls() {
        let client = EdgarClient::new("Test/1.0 (test@example.com)")
            .unwrap()
            .with_archives_url("http://localhost:8080/edgar/");

        let quarter = Quarter::new(2019, 4).unwrap();
        assert_eq!(
            client.quarter_index_url(quarter),
            "http://localhost:8080/edgar/full-index/2019/QTR4/xbrl.idx"
        );
        assert_eq!(
            client.filing_directory_url(&filing()),
            "http://localhost:8080/edgar/data/320193/000032019319000119"
        );
    }

    #[test]
    fn test_directory_listing_deserializes() {
        let json = r#"{
            "directory": {
                "item": [
                    {"last-modified": "2019-10-30 18:04:43", "name": "0000320193-19-000119-index.htm", "type": "text.gif", "size": ""},
                    {"last-modified": "2019-10-30 18:04:43", "name": "a10-k20199282019.htm", "type": "text.gif", "size": "1449017"},
                    {"last-modified": "2019-10-30 18:04:43", "name": "aapl-20190928.xml", "type": "text.gif", "size": "5765446"}
                ],
                "name": "/Archives/edgar/data/320193/000032019319000119",
                "parent-dir": "/Archives/edgar/data/320193"
            }
        }"#;
        let listing: DirectoryListing = serde_json::from_str(json).unwrap();
        let names: Vec<String> = listing.directory.item.into_iter().map(|i| i.name).collect();
        assert_eq!(names.len(), 3);
        assert_eq!(select_instance(&names), Some("aapl-20190928.xml"));
    }

    #[tokio::test]
    async fn test_rate_limiter_spaces_requests() {
        let mut limiter = RateLimiter::new(Duration::from_millis(20));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}

//! Filing processor tying a document source, the resolution engine and an
//! output sink together.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use financials_core::{
    Accession, Filing, FilingRecord, FilingSource, FinancialsError, RecordSink, Result,
};
use financials_resolve::{FilingDocument, MappingTable, extract, ticker_from_instance_name};

/// Runs filings through locate → fetch → parse → extract → sink.
///
/// Each filing is processed start to finish before the next one begins. A
/// fetch, parse or sink fault ends that filing only.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use financials::{EdgarClient, FilingProcessor, MemorySink, Quarter};
///
/// let edgar = Arc::new(EdgarClient::new("MyApp/1.0 (contact@example.com)")?);
/// let sink = Arc::new(MemorySink::new());
/// let processor = FilingProcessor::new(edgar.clone(), sink.clone());
///
/// let filings = edgar.quarter_index("2019/QTR4".parse::<Quarter>()?).await?;
/// let summary = processor.process_all(&filings).await;
/// println!("{} processed, {} failed", summary.processed, summary.failures.len());
/// ```
pub struct FilingProcessor {
    source: Arc<dyn FilingSource>,
    sink: Arc<dyn RecordSink>,
    table: MappingTable,
}

impl std::fmt::Debug for FilingProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilingProcessor")
            .field("source", &self.source.name())
            .field("sink", &"configured")
            .field("table", &self.table.version)
            .finish()
    }
}

/// A filing that could not be processed.
#[derive(Debug)]
pub struct ProcessFailure {
    /// Accession of the failed filing.
    pub accession: Accession,
    /// What went wrong.
    pub error: FinancialsError,
}

/// Outcome of [`FilingProcessor::process_all`].
#[derive(Debug, Default)]
pub struct ProcessSummary {
    /// Filings written to the sink.
    pub processed: usize,
    /// Filings that failed, in input order.
    pub failures: Vec<ProcessFailure>,
}

impl FilingProcessor {
    /// Create a processor using the standard mapping table.
    #[must_use]
    pub fn new(source: Arc<dyn FilingSource>, sink: Arc<dyn RecordSink>) -> Self {
        Self {
            source,
            sink,
            table: MappingTable::standard(),
        }
    }

    /// Use a different mapping table.
    #[must_use]
    pub fn with_table(mut self, table: MappingTable) -> Self {
        self.table = table;
        self
    }

    /// The mapping table in use.
    #[must_use]
    pub const fn table(&self) -> &MappingTable {
        &self.table
    }

    /// Process one filing and write its record and history to the sink.
    ///
    /// # Errors
    /// Returns the first fetch, parse or sink error encountered. Fields that
    /// cannot be resolved are not errors; they are left empty in the record.
    #[instrument(skip(self, filing), fields(accession = %filing.accession, form = %filing.form))]
    pub async fn process(&self, filing: &Filing) -> Result<FilingRecord> {
        let locator = self.source.locate_instance(filing).await?;
        let text = self.source.fetch_document(&locator).await?;
        let document = FilingDocument::parse(&text)?;

        let mut extraction = extract(&document, filing, &self.table);
        if extraction.record.ticker.is_none() {
            extraction.record.ticker = ticker_from_instance_name(&locator);
        }

        self.sink.write_record(&extraction.record).await?;
        self.sink
            .write_history(&filing.accession, &extraction.history)
            .await?;

        debug!(
            resolved = extraction.record.values.len(),
            history = extraction.history.len(),
            "Processed filing"
        );
        Ok(extraction.record)
    }

    /// Process filings in order, continuing past failures.
    pub async fn process_all(&self, filings: &[Filing]) -> ProcessSummary {
        let mut summary = ProcessSummary::default();
        for filing in filings {
            match self.process(filing).await {
                Ok(_) => summary.processed += 1,
                Err(e) => {
                    warn!(
                        accession = %filing.accession,
                        error = %e,
                        "Filing failed, continuing with next"
                    );
                    summary.failures.push(ProcessFailure {
                        accession: filing.accession.clone(),
                        error: e,
                    });
                }
            }
        }
        info!(
            processed = summary.processed,
            failed = summary.failures.len(),
            "Finished processing filings"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use financials_core::{Field, HistoryRecord};
    use financials_sink::MemorySink;
    use std::collections::HashMap;

    const INSTANCE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xbrli:xbrl xmlns:xbrli="http://www.xbrl.org/2003/instance"
    xmlns:us-gaap="http://fasb.org/us-gaap/2019-01-31"
    xmlns:dei="http://xbrl.sec.gov/dei/2019-01-31">
  <xbrli:context id="FY2019">
    <xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000320193</xbrli:identifier></xbrli:entity>
    <xbrli:period><xbrli:startDate>2018-09-30</xbrli:startDate><xbrli:endDate>2019-09-28</xbrli:endDate></xbrli:period>
  </xbrli:context>
  <xbrli:context id="I2019">
    <xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000320193</xbrli:identifier></xbrli:entity>
    <xbrli:period><xbrli:instant>2019-09-28</xbrli:instant></xbrli:period>
  </xbrli:context>
  <xbrli:context id="I2018">
    <xbrli:entity><xbrli:identifier scheme="http://www.sec.gov/CIK">0000320193</xbrli:identifier></xbrli:entity>
    <xbrli:period><xbrli:instant>2018-09-29</xbrli:instant></xbrli:period>
  </xbrli:context>
  <dei:DocumentFiscalYearFocus contextRef="FY2019">2019</dei:DocumentFiscalYearFocus>
  <dei:DocumentFiscalPeriodFocus contextRef="FY2019">FY</dei:DocumentFiscalPeriodFocus>
  <us-gaap:Assets contextRef="I2019" unitRef="usd" decimals="-6">338516000000</us-gaap:Assets>
  <us-gaap:Assets contextRef="I2018" unitRef="usd" decimals="-6">365725000000</us-gaap:Assets>
  <us-gaap:NetIncomeLoss contextRef="FY2019" unitRef="usd" decimals="-6">55256000000</us-gaap:NetIncomeLoss>
</xbrli:xbrl>"#;

    #[derive(Debug, Default)]
    struct FixtureSource {
        documents: HashMap<String, String>,
    }

    impl FixtureSource {
        fn with(mut self, accession: &str, name: &str, text: &str) -> Self {
            self.documents
                .insert(accession.to_string(), format!("{}|{}", name, text));
            self
        }
    }

    #[async_trait]
    impl FilingSource for FixtureSource {
        fn name(&self) -> &str {
            "fixture"
        }

        async fn locate_instance(&self, filing: &Filing) -> Result<String> {
            let entry = self
                .documents
                .get(filing.accession.as_str())
                .ok_or_else(|| FinancialsError::DocumentNotFound(filing.accession.to_string()))?;
            let (name, _) = entry.split_once('|').unwrap_or((entry, ""));
            Ok(format!("{}/{}", filing.accession, name))
        }

        async fn fetch_document(&self, locator: &str) -> Result<String> {
            let (accession, _) = locator
                .split_once('/')
                .ok_or_else(|| FinancialsError::Network(locator.to_string()))?;
            let entry = self
                .documents
                .get(accession)
                .ok_or_else(|| FinancialsError::Network(locator.to_string()))?;
            Ok(entry.split_once('|').map_or("", |(_, text)| text).to_string())
        }
    }

    fn filing(accession: &str) -> Filing {
        Filing::new(
            "320193",
            "Apple Inc.",
            "10-K",
            NaiveDate::from_ymd_opt(2019, 10, 31).unwrap(),
            Accession::new(accession),
        )
    }

    fn processor(source: FixtureSource) -> (FilingProcessor, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        (FilingProcessor::new(Arc::new(source), sink.clone()), sink)
    }

    #[tokio::test]
    async fn test_process_writes_record_and_history() {
        let source = FixtureSource::default().with("a-1", "aapl-20190928.xml", INSTANCE);
        let (processor, sink) = processor(source);

        let record = processor.process(&filing("a-1")).await.unwrap();
        assert_eq!(record.get(Field::Assets), Some("338516000000"));
        assert_eq!(record.get(Field::NetIncome), Some("55256000000"));
        assert_eq!(record.focus.as_deref(), Some("2019FY"));
        assert_eq!(record.ticker.as_deref(), Some("AAPL"));

        assert_eq!(sink.records().await, vec![record]);
        let history: Vec<HistoryRecord> = sink.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].value, "365725000000");
        assert_eq!(history[0].date_stamp(), "20180929");
    }

    #[tokio::test]
    async fn test_process_propagates_parse_errors() {
        let source = FixtureSource::default().with("a-1", "bad.xml", "<xbrl><unclosed></xbrl>");
        let (processor, sink) = processor(source);

        let result = processor.process(&filing("a-1")).await;
        assert!(matches!(result, Err(FinancialsError::Parse(_))));
        assert!(sink.records().await.is_empty());
    }

    #[tokio::test]
    async fn test_process_all_continues_past_failures() {
        let source = FixtureSource::default()
            .with("a-1", "aapl-20190928.xml", INSTANCE)
            .with("a-3", "instance.xml", INSTANCE);
        let (processor, sink) = processor(source);

        let filings = vec![filing("a-1"), filing("a-2"), filing("a-3")];
        let summary = processor.process_all(&filings).await;

        assert_eq!(summary.processed, 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].accession.as_str(), "a-2");
        assert!(matches!(
            summary.failures[0].error,
            FinancialsError::DocumentNotFound(_)
        ));

        let records = sink.records().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].ticker, None);
    }

    #[tokio::test]
    async fn test_reprocessing_replaces_record_and_history() {
        let source = FixtureSource::default().with("a-1", "aapl-20190928.xml", INSTANCE);
        let (processor, sink) = processor(source);

        processor.process(&filing("a-1")).await.unwrap();
        processor.process(&filing("a-1")).await.unwrap();

        assert_eq!(sink.records().await.len(), 1);
        let history = sink.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].value, "365725000000");
    }

    #[test]
    fn test_debug_lists_source_and_table() {
        let (processor, _) = processor(FixtureSource::default());
        let debug = format!("{:?}", processor);
        assert!(debug.contains("fixture"));
        assert!(debug.contains(&processor.table().version));
    }
}

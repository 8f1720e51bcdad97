//! SQLite-based sink implementation.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use financials_core::{
    Accession, Field, FilingRecord, FinancialsError, HistoryRecord, RecordSink, Result,
};
use polars::prelude::DataFrame;
use rusqlite::{Connection, Row, params};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, instrument};

use crate::frame::{history_frame, records_frame};

fn sink_error(e: impl std::fmt::Display) -> FinancialsError {
    FinancialsError::Sink(e.to_string())
}

/// SQLite-backed sink.
///
/// Records go to a `filings` table keyed by accession, with the resolved
/// field values stored as a JSON object. History goes to a `history` table
/// whose rows for an accession are rewritten together.
#[derive(Debug)]
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Create a new SQLite sink at the given path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or schema creation fails.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path).map_err(sink_error)?;
        let sink = Self {
            conn: Mutex::new(conn),
        };
        sink.initialize_schema()?;
        Ok(sink)
    }

    /// Create an in-memory SQLite sink.
    ///
    /// Useful for testing; data is lost when the sink is dropped.
    ///
    /// # Errors
    /// Returns an error if schema creation fails.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sink_error)?;
        let sink = Self {
            conn: Mutex::new(conn),
        };
        sink.initialize_schema()?;
        Ok(sink)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(sink_error)
    }

    /// Initialize the database schema.
    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS filings (
                accession TEXT PRIMARY KEY,
                focus TEXT,
                ticker TEXT,
                cik TEXT NOT NULL,
                form TEXT NOT NULL,
                form_date TEXT,
                filed TEXT NOT NULL,
                name TEXT NOT NULL,
                values_json TEXT NOT NULL,
                written_at TEXT NOT NULL
            )",
            [],
        )
        .map_err(sink_error)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                accession TEXT NOT NULL,
                field TEXT NOT NULL,
                element TEXT NOT NULL,
                date TEXT NOT NULL,
                value TEXT NOT NULL
            )",
            [],
        )
        .map_err(sink_error)?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_history_accession ON history(accession)",
            [],
        )
        .map_err(sink_error)?;

        debug!("SQLite sink schema initialized");
        Ok(())
    }

    /// Stored records, in first-write order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn records(&self) -> Result<Vec<FilingRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT accession, focus, ticker, cik, form, form_date, filed, name, values_json
                 FROM filings ORDER BY rowid ASC",
            )
            .map_err(sink_error)?;

        let rows = stmt.query_map([], StoredRecord::from_row).map_err(sink_error)?;
        rows.map(|row| row.map_err(sink_error)?.into_record())
            .collect()
    }

    /// History stream, in write order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored row is malformed.
    pub fn history(&self) -> Result<Vec<HistoryRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT accession, field, element, date, value FROM history ORDER BY id ASC")
            .map_err(sink_error)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })
            .map_err(sink_error)?;

        let mut history = Vec::new();
        for row in rows {
            let (accession, field, element, date, value) = row.map_err(sink_error)?;
            history.push(HistoryRecord {
                accession: Accession::new(accession),
                field: field.parse()?,
                element,
                date: parse_date(&date)?,
                value,
            });
        }
        Ok(history)
    }

    /// Stored records as a DataFrame.
    ///
    /// # Errors
    /// Returns an error if reading or frame assembly fails.
    pub fn records_frame(&self) -> Result<DataFrame> {
        records_frame(&self.records()?)
    }

    /// History stream as a DataFrame.
    ///
    /// # Errors
    /// Returns an error if reading or frame assembly fails.
    pub fn history_frame(&self) -> Result<DataFrame> {
        history_frame(&self.history()?)
    }
}

/// A `filings` row before its JSON and date columns are decoded.
struct StoredRecord {
    accession: String,
    focus: Option<String>,
    ticker: Option<String>,
    cik: String,
    form: String,
    form_date: Option<String>,
    filed: String,
    name: String,
    values_json: String,
}

impl StoredRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            accession: row.get(0)?,
            focus: row.get(1)?,
            ticker: row.get(2)?,
            cik: row.get(3)?,
            form: row.get(4)?,
            form_date: row.get(5)?,
            filed: row.get(6)?,
            name: row.get(7)?,
            values_json: row.get(8)?,
        })
    }

    fn into_record(self) -> Result<FilingRecord> {
        let keyed: BTreeMap<String, String> =
            serde_json::from_str(&self.values_json).map_err(sink_error)?;
        let values = keyed
            .into_iter()
            .map(|(key, value)| Ok((key.parse::<Field>()?, value)))
            .collect::<Result<BTreeMap<_, _>>>()?;

        Ok(FilingRecord {
            focus: self.focus,
            ticker: self.ticker,
            cik: self.cik,
            form: self.form,
            form_date: self.form_date,
            filed: parse_date(&self.filed)?,
            accession: Accession::new(self.accession),
            name: self.name,
            values,
        })
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| FinancialsError::Sink(format!("Invalid stored date {}: {}", s, e)))
}

#[async_trait]
impl RecordSink for SqliteSink {
    #[instrument(skip(self, record), fields(accession = %record.accession))]
    async fn write_record(&self, record: &FilingRecord) -> Result<()> {
        let keyed: BTreeMap<&str, &str> = record
            .values
            .iter()
            .map(|(field, value)| (field.key(), value.as_str()))
            .collect();
        let values_json = serde_json::to_string(&keyed).map_err(sink_error)?;
        let written_at = Utc::now().to_rfc3339();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO filings
             (accession, focus, ticker, cik, form, form_date, filed, name, values_json, written_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
             ON CONFLICT(accession) DO UPDATE SET
                focus = excluded.focus,
                ticker = excluded.ticker,
                cik = excluded.cik,
                form = excluded.form,
                form_date = excluded.form_date,
                filed = excluded.filed,
                name = excluded.name,
                values_json = excluded.values_json,
                written_at = excluded.written_at",
            params![
                record.accession.as_str(),
                record.focus,
                record.ticker,
                record.cik,
                record.form,
                record.form_date,
                record.filed.to_string(),
                record.name,
                values_json,
                written_at,
            ],
        )
        .map_err(sink_error)?;

        debug!(fields = record.values.len(), "Stored filing record");
        Ok(())
    }

    #[instrument(skip(self, accession, history), fields(accession = %accession, count = history.len()))]
    async fn write_history(
        &self,
        accession: &Accession,
        history: &[HistoryRecord],
    ) -> Result<()> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(sink_error)?;
        let removed = tx
            .execute(
                "DELETE FROM history WHERE accession = ?1",
                params![accession.as_str()],
            )
            .map_err(sink_error)?;
        for entry in history {
            tx.execute(
                "INSERT INTO history (accession, field, element, date, value)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entry.accession.as_str(),
                    entry.field.key(),
                    entry.element,
                    entry.date.to_string(),
                    entry.value,
                ],
            )
            .map_err(sink_error)?;
        }
        tx.commit().map_err(sink_error)?;

        debug!(removed, "Replaced history records");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM filings", []).map_err(sink_error)?;
        conn.execute("DELETE FROM history", []).map_err(sink_error)?;
        debug!("SQLite sink cleared");
        Ok(())
    }
}

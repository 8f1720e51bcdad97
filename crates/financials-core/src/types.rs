//! Core data types for filing extraction.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Accession`] - Accession number of one filing submission
//! - [`Filing`] - One row of the EDGAR quarterly XBRL index
//! - [`FilingRecord`] - Resolved values and metadata for one filing
//! - [`HistoryRecord`] - A candidate value superseded during resolution

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FinancialsError, Result};
use crate::field::Field;
use crate::period::PeriodType;

/// Forms whose XBRL instance documents are processed.
pub const PERIODIC_FORMS: &[&str] = &[
    "10-K", "10-K/A", "10-KT", "10-KT/A", "10-Q", "10-Q/A", "10-QT", "10-QT/A",
];

/// Metadata columns that precede the canonical fields in a [`FilingRecord`] row.
///
/// `zip` and `acceptance` come from the submission header, which is not read,
/// so they are always empty.
pub const METADATA_COLUMNS: &[&str] = &[
    "focus",
    "ticker",
    "cik",
    "zip",
    "form",
    "formdate",
    "filedate",
    "acceptance",
    "accession",
    "name",
];

/// Columns of a [`HistoryRecord`] row.
pub const HISTORY_COLUMNS: &[&str] = &["accession", "field", "element", "date", "value"];

/// Accession number identifying one filing submission, e.g. `0000320193-19-000119`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Accession(String);

impl Accession {
    /// Creates a new accession number, trimming surrounding whitespace.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().trim().to_string())
    }

    /// Derives the accession number from an index path such as
    /// `edgar/data/320193/0000320193-19-000119.txt`.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let file = path.rsplit('/').next().unwrap_or(path);
        Self::new(file.trim_end_matches(".txt"))
    }

    /// Returns the accession number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accession number without dashes, as used in EDGAR archive paths.
    #[must_use]
    pub fn compact(&self) -> String {
        self.0.replace('-', "")
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Accession {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// One filing listed in the EDGAR quarterly XBRL index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    /// Registrant's Central Index Key, as listed (not zero-padded).
    pub cik: String,
    /// Self-reported filer name.
    pub name: String,
    /// Form type, e.g. `10-Q`.
    pub form: String,
    /// Date the filing was submitted.
    pub filed: NaiveDate,
    /// Accession number.
    pub accession: Accession,
}

impl Filing {
    /// Creates a filing description with required fields.
    #[must_use]
    pub fn new(
        cik: impl Into<String>,
        name: impl Into<String>,
        form: impl Into<String>,
        filed: NaiveDate,
        accession: Accession,
    ) -> Self {
        Self {
            cik: cik.into(),
            name: name.into(),
            form: form.into(),
            filed,
            accession,
        }
    }

    /// Parses a `cik|name|form|date|path` line from an `xbrl.idx` file.
    ///
    /// # Errors
    /// Returns [`FinancialsError::InvalidIndexLine`] if the line does not have
    /// exactly five columns or the date is not `YYYY-MM-DD`.
    pub fn from_index_line(line: &str) -> Result<Self> {
        let columns: Vec<&str> = line.trim().split('|').map(str::trim).collect();
        let [cik, name, form, date, path] = columns.as_slice() else {
            return Err(FinancialsError::InvalidIndexLine(line.to_string()));
        };
        let filed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| FinancialsError::InvalidIndexLine(line.to_string()))?;
        Ok(Self::new(*cik, *name, *form, filed, Accession::from_path(path)))
    }

    /// Annual or interim, derived from the form type.
    #[must_use]
    pub fn period_type(&self) -> PeriodType {
        PeriodType::from_form(&self.form)
    }

    /// Returns true if the form is one of [`PERIODIC_FORMS`].
    #[must_use]
    pub fn is_periodic_report(&self) -> bool {
        PERIODIC_FORMS.contains(&self.form.as_str())
    }
}

/// Resolved values and identifying metadata for one filing.
///
/// Canonical fields that could not be resolved are absent from `values` and
/// render as empty cells in [`row`](Self::row).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilingRecord {
    /// Fiscal year and period focus, e.g. `2019FY`.
    pub focus: Option<String>,
    /// Trading symbol.
    pub ticker: Option<String>,
    /// Registrant's Central Index Key.
    pub cik: String,
    /// Form type.
    pub form: String,
    /// Document period end date as reported in the filing.
    pub form_date: Option<String>,
    /// Date the filing was submitted.
    pub filed: NaiveDate,
    /// Accession number.
    pub accession: Accession,
    /// Filer name.
    pub name: String,
    /// Resolved canonical field values.
    pub values: BTreeMap<Field, String>,
}

impl FilingRecord {
    /// Creates an empty record carrying the filing's identifying metadata.
    #[must_use]
    pub fn new(filing: &Filing) -> Self {
        Self {
            focus: None,
            ticker: None,
            cik: filing.cik.clone(),
            form: filing.form.clone(),
            form_date: None,
            filed: filing.filed,
            accession: filing.accession.clone(),
            name: filing.name.clone(),
            values: BTreeMap::new(),
        }
    }

    /// Resolved value of a canonical field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// Stores a resolved value; `None` clears the field.
    pub fn set(&mut self, field: Field, value: Option<String>) {
        match value {
            Some(value) => {
                self.values.insert(field, value);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }

    /// Column names in output order: metadata first, then every canonical field.
    #[must_use]
    pub fn columns() -> Vec<&'static str> {
        METADATA_COLUMNS
            .iter()
            .copied()
            .chain(Field::ALL.iter().map(|f| f.key()))
            .collect()
    }

    /// Ordered values matching [`columns`](Self::columns); `None` for nulls.
    #[must_use]
    pub fn row(&self) -> Vec<Option<String>> {
        let mut row = vec![
            self.focus.clone(),
            self.ticker.clone(),
            Some(self.cik.clone()),
            None,
            Some(self.form.clone()),
            self.form_date.clone(),
            Some(self.filed.to_string()),
            None,
            Some(self.accession.to_string()),
            Some(self.name.clone()),
        ];
        row.extend(Field::ALL.iter().map(|f| self.values.get(f).cloned()));
        row
    }
}

/// A candidate value that lost period selection for a field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRecord {
    /// Accession of the filing the value was found in.
    pub accession: Accession,
    /// Canonical field being resolved.
    pub field: Field,
    /// Source XBRL element (local name).
    pub element: String,
    /// Instant date or period end date of the discarded fact.
    pub date: NaiveDate,
    /// Discarded value.
    pub value: String,
}

impl HistoryRecord {
    /// Period date formatted as `YYYYMMDD`.
    #[must_use]
    pub fn date_stamp(&self) -> String {
        self.date.format("%Y%m%d").to_string()
    }

    /// Ordered values matching [`HISTORY_COLUMNS`].
    #[must_use]
    pub fn row(&self) -> [String; 5] {
        [
            self.accession.to_string(),
            self.field.key().to_string(),
            self.element.clone(),
            self.date_stamp(),
            self.value.clone(),
        ]
    }
}

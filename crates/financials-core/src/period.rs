//! Reporting period definitions.
//!
//! This module defines [`PeriodType`], the annual/interim classification of a
//! filing that drives period selection, and [`Quarter`], the EDGAR index
//! quarter a filing was published in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinancialsError;

/// Duration facts of an annual filing must span more than this many days.
pub const ANNUAL_MIN_DAYS: i64 = 300;

/// Lower bound (exclusive) on the span of a quarterly duration fact, in days.
pub const QUARTER_MIN_DAYS: i64 = 60;

/// Upper bound (exclusive) on the span of a quarterly duration fact, in days.
pub const QUARTER_MAX_DAYS: i64 = 100;

/// Period type of a filing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodType {
    /// Annual report (10-K family).
    #[default]
    Annual,
    /// Interim report (10-Q family).
    Quarterly,
}

impl PeriodType {
    /// Classifies a form type. Any form containing `K` is annual.
    ///
    /// ```
    /// use financials_core::PeriodType;
    ///
    /// assert_eq!(PeriodType::from_form("10-KT/A"), PeriodType::Annual);
    /// assert_eq!(PeriodType::from_form("10-Q"), PeriodType::Quarterly);
    /// ```
    #[must_use]
    pub fn from_form(form: &str) -> Self {
        if form.contains('K') {
            Self::Annual
        } else {
            Self::Quarterly
        }
    }

    /// Returns true if a duration fact of this span belongs to this period type.
    ///
    /// `diff` is `start - end` in days, so longer periods are more negative.
    #[must_use]
    pub const fn accepts(self, diff: i64) -> bool {
        match self {
            Self::Annual => diff < -ANNUAL_MIN_DAYS,
            Self::Quarterly => diff < -QUARTER_MIN_DAYS && diff > -QUARTER_MAX_DAYS,
        }
    }
}

/// A calendar quarter of the EDGAR full index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

impl Quarter {
    /// Creates a quarter, returning `None` unless `quarter` is 1 through 4.
    #[must_use]
    pub const fn new(year: i32, quarter: u8) -> Option<Self> {
        if quarter >= 1 && quarter <= 4 {
            Some(Self { year, quarter })
        } else {
            None
        }
    }

    /// Quarter containing the given month (1-12).
    #[must_use]
    pub const fn from_month(year: i32, month: u32) -> Option<Self> {
        if month == 0 || month > 12 {
            return None;
        }
        Self::new(year, ((month - 1) / 3 + 1) as u8)
    }

    /// Calendar year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Quarter number (1-4).
    #[must_use]
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Path segment used by the EDGAR full index, e.g. `2009/QTR1`.
    #[must_use]
    pub fn index_path(&self) -> String {
        format!("{}/QTR{}", self.year, self.quarter)
    }

    /// Short label used to name per-quarter outputs, e.g. `2009Q1`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}Q{}", self.year, self.quarter)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/QTR{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = FinancialsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FinancialsError::InvalidParameter(format!("Invalid quarter: {}", s));
        let (year, quarter) = s.trim().split_once("/QTR").ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let quarter = quarter.parse::<u8>().map_err(|_| invalid())?;
        Self::new(year, quarter).ok_or_else(invalid)
    }
}

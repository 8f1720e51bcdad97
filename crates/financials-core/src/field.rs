//! Canonical financial statement fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FinancialsError;

/// Financial statement a canonical field belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statement {
    /// Balance sheet (instant facts).
    BalanceSheet,
    /// Income statement (duration facts).
    IncomeStatement,
    /// Cash flow statement (duration facts).
    CashFlow,
}

macro_rules! fields {
    ($($(#[$doc:meta])* $variant:ident => $key:literal, $statement:ident;)+) => {
        /// A standardized accounting concept produced for every filing.
        ///
        /// Declaration order is the output column order.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum Field {
            $(
                $(#[$doc])*
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl Field {
            /// All fields in output column order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Dotted output name, e.g. `bs.assets`.
            #[must_use]
            pub const fn key(self) -> &'static str {
                match self {
                    $(Self::$variant => $key,)+
                }
            }

            /// Statement this field is reported on.
            #[must_use]
            pub const fn statement(self) -> Statement {
                match self {
                    $(Self::$variant => Statement::$statement,)+
                }
            }
        }
    };
}

fields! {
    /// Total assets.
    Assets => "bs.assets", BalanceSheet;
    /// Cash and cash equivalents.
    Cash => "bs.cash", BalanceSheet;
    /// Current assets.
    CurrentAssets => "bs.currentassets", BalanceSheet;
    /// Property, plant and equipment, net.
    PpeNet => "bs.ppenet", BalanceSheet;
    /// Property, plant and equipment, gross.
    PpeGross => "bs.ppegross", BalanceSheet;
    /// Current liabilities.
    CurrentLiabilities => "bs.currentliabilities", BalanceSheet;
    /// Long-term debt.
    LongTermDebt => "bs.longtermdebt", BalanceSheet;
    /// Stockholders' equity.
    Equity => "bs.equity", BalanceSheet;
    /// Sales / revenue.
    Sales => "is.sales", IncomeStatement;
    /// Cost of goods sold.
    Cogs => "is.cogs", IncomeStatement;
    /// Gross profit.
    GrossProfit => "is.grossprofit", IncomeStatement;
    /// Research and development expense.
    Research => "is.research", IncomeStatement;
    /// Selling, general and administrative expense.
    Sga => "is.sga", IncomeStatement;
    /// Operating expenses.
    OperatingExpenses => "is.opexpenses", IncomeStatement;
    /// EBITDA approximation.
    Ebitda => "is.ebitda", IncomeStatement;
    /// Income tax.
    IncomeTax => "is.incometax", IncomeStatement;
    /// Net income.
    NetIncome => "is.netincome", IncomeStatement;
    /// Pre-tax income from continuing operations.
    OperatingIncome => "is.opincome", IncomeStatement;
    /// Net cash from operating activities.
    OperatingCashFlow => "cf.operating", CashFlow;
    /// Depreciation.
    Depreciation => "cf.depreciation", CashFlow;
    /// Net cash from investing activities.
    InvestingCashFlow => "cf.investing", CashFlow;
    /// Capital expenditures.
    CapitalExpenditures => "cf.ppe", CashFlow;
    /// Net cash from financing activities.
    FinancingCashFlow => "cf.financing", CashFlow;
    /// Dividends paid.
    Dividends => "cf.dividends", CashFlow;
    /// Change in cash and cash equivalents.
    CashChange => "cf.cashchange", CashFlow;
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Field {
    type Err = FinancialsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key() == s)
            .ok_or_else(|| FinancialsError::InvalidParameter(format!("Unknown field: {}", s)))
    }
}

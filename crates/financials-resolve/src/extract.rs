//! Per-filing extraction.
//!
//! [`extract`] runs every rule of a [`MappingTable`] against one parsed
//! instance document and returns the filled [`FilingRecord`] together with
//! the history of superseded candidates.

use financials_core::{Field, Filing, FilingRecord, HistoryRecord};
use tracing::debug;

use crate::amount;
use crate::document::FilingDocument;
use crate::entity::EntityScope;
use crate::history::History;
use crate::mapping::{FieldSpec, MappingTable, Rule};
use crate::resolver::FilingScope;

/// Result of extracting one filing.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    /// Resolved values and metadata.
    pub record: FilingRecord,
    /// Candidates passed over during period selection.
    pub history: Vec<HistoryRecord>,
}

/// Resolves every field of `table` for `filing`.
///
/// Fields are resolved in table order, so derived fields see the values of
/// the fields listed before them. Unresolvable fields stay empty.
#[must_use]
pub fn extract(document: &FilingDocument, filing: &Filing, table: &MappingTable) -> Extraction {
    let entity = EntityScope::detect(document, &filing.cik);
    let scope = FilingScope::new(document, entity, filing.period_type(), &filing.accession);
    let mut history = History::new();
    let mut record = FilingRecord::new(filing);

    let mut meta = |element: &str| scope.pull(element, None, &mut history);
    record.ticker = meta("TradingSymbol")
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty());
    record.focus = match (meta("DocumentFiscalYearFocus"), meta("DocumentFiscalPeriodFocus")) {
        (Some(year), Some(period)) => Some(format!("{}{}", year, period)),
        _ => None,
    };
    record.form_date = meta("DocumentPeriodEndDate");

    for spec in table.iter() {
        let value = resolve(&scope, spec, &record, &mut history);
        debug!(
            accession = %filing.accession,
            field = %spec.field,
            value = value.as_deref().unwrap_or(""),
            "Resolved field"
        );
        record.set(spec.field, value);
    }

    debug!(
        accession = %filing.accession,
        resolved = record.values.len(),
        history = history.len(),
        "Extracted filing"
    );
    Extraction {
        record,
        history: history.into_records(),
    }
}

fn resolve(
    scope: &FilingScope<'_>,
    spec: &FieldSpec,
    record: &FilingRecord,
    history: &mut History,
) -> Option<String> {
    let field = spec.history.then_some(spec.field);
    if let Some(value) = scope.pull_first(spec.rule.tags(), field, history) {
        return Some(value);
    }

    match &spec.rule {
        Rule::FirstOf { .. } => None,
        Rule::SumOf { components, .. } => {
            let present: Vec<String> = components
                .iter()
                .filter_map(|element| scope.pull(element, None, history))
                .collect();
            amount::combine(&present)
        }
        Rule::Ebitda { addback, .. } => {
            let gross_profit = record.get(Field::GrossProfit)?;
            let operating_expenses = record.get(Field::OperatingExpenses)?;
            let addback = scope.pull_first(addback, None, history)?;
            amount::ebitda(gross_profit, operating_expenses, &addback)
        }
        Rule::CashChange { fx_effect, .. } => {
            let operating = record.get(Field::OperatingCashFlow)?;
            let investing = record.get(Field::InvestingCashFlow)?;
            let financing = record.get(Field::FinancingCashFlow)?;
            let fx = scope.pull_first(fx_effect, None, history);
            amount::cash_change(operating, investing, financing, fx.as_deref())
        }
    }
}

/// Ticker implied by an instance document name such as `aapl-20190928.xml`.
///
/// Returns the uppercased prefix before the first `-` when it is purely
/// alphabetic.
#[must_use]
pub fn ticker_from_instance_name(name: &str) -> Option<String> {
    let file = name.rsplit('/').next().unwrap_or(name);
    let (prefix, _) = file.split_once('-')?;
    (!prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_alphabetic()))
        .then(|| prefix.to_uppercase())
}

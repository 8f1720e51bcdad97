//! Fact resolution.
//!
//! A concept is usually reported several times in one filing: the current
//! period next to prior-year comparatives, restated quarters, year-to-date
//! totals. [`FilingScope::pull`] narrows the candidates for one element to a
//! single value:
//!
//! 1. facts with empty text or an unknown context are dropped;
//! 2. facts in segment contexts, or outside the active entity scope, are dropped;
//! 3. a single survivor is returned as is;
//! 4. instant facts: the latest instant wins;
//! 5. duration facts: the latest end date wins among facts whose length fits
//!    the filing's period type, then the longest; if no length fits, all
//!    duration facts compete.
//!
//! The candidates that lose in steps 4 and 5 are written to [`History`] when
//! a field is given.

use std::cmp::Reverse;

use chrono::NaiveDate;
use financials_core::{Accession, Field, PeriodType};
use tracing::trace;

use crate::context::ContextRecord;
use crate::document::{Fact, FilingDocument};
use crate::entity::EntityScope;
use crate::history::History;

/// Everything resolution needs to know about one filing.
///
/// Built once per filing and passed to every lookup; it holds no state that
/// outlives the filing.
#[derive(Debug)]
pub struct FilingScope<'a> {
    document: &'a FilingDocument,
    entity: EntityScope,
    period_type: PeriodType,
    accession: &'a Accession,
}

/// A fact with its resolved context.
struct Candidate<'a> {
    fact: &'a Fact,
    context: &'a ContextRecord,
}

/// A fact ranked by the date it is reported for.
struct Ranked<'a> {
    fact: &'a Fact,
    date: NaiveDate,
}

impl<'a> FilingScope<'a> {
    /// Creates a scope for one filing.
    #[must_use]
    pub const fn new(
        document: &'a FilingDocument,
        entity: EntityScope,
        period_type: PeriodType,
        accession: &'a Accession,
    ) -> Self {
        Self {
            document,
            entity,
            period_type,
            accession,
        }
    }

    /// The filing's document.
    #[must_use]
    pub const fn document(&self) -> &FilingDocument {
        self.document
    }

    /// Active entity scope.
    #[must_use]
    pub const fn entity(&self) -> &EntityScope {
        &self.entity
    }

    /// Annual or interim.
    #[must_use]
    pub const fn period_type(&self) -> PeriodType {
        self.period_type
    }

    /// Resolves `element` to a single value.
    ///
    /// With `field` set, candidates passed over during period selection are
    /// appended to `history` under that field. `None` when no usable fact
    /// exists; this never fails.
    pub fn pull(
        &self,
        element: &str,
        field: Option<Field>,
        history: &mut History,
    ) -> Option<String> {
        let candidates = self.candidates(element);
        let first = match candidates.as_slice() {
            [] => {
                trace!(element, "No usable facts");
                return None;
            }
            [only] => return Some(only.fact.value.clone()),
            [first, ..] => first,
        };

        let ranked = if first.context.is_instant() {
            rank_instants(&candidates)
        } else {
            rank_durations(&candidates, self.period_type)
        };

        let (chosen, passed_over) = ranked.split_first()?;
        trace!(
            element,
            date = %chosen.date,
            passed_over = passed_over.len(),
            "Selected fact"
        );
        if let Some(field) = field {
            for ranked in passed_over {
                history.record(
                    self.accession,
                    field,
                    &ranked.fact.element,
                    ranked.date,
                    &ranked.fact.value,
                );
            }
        }
        Some(chosen.fact.value.clone())
    }

    /// Tries `elements` in order and returns the first value that resolves.
    pub fn pull_first(
        &self,
        elements: &[String],
        field: Option<Field>,
        history: &mut History,
    ) -> Option<String> {
        elements
            .iter()
            .find_map(|element| self.pull(element, field, history))
    }

    /// Facts for `element` that survive the text, context and scope filters.
    fn candidates(&self, element: &str) -> Vec<Candidate<'a>> {
        self.document
            .facts(element)
            .iter()
            .filter(|fact| !fact.value.is_empty())
            .filter_map(|fact| {
                let context = self.document.context_of(fact)?;
                Some(Candidate { fact, context })
            })
            .filter(|candidate| self.entity.admits(candidate.context))
            .collect()
    }
}

/// Latest instant first; facts without an instant date are dropped.
fn rank_instants<'a>(candidates: &[Candidate<'a>]) -> Vec<Ranked<'a>> {
    let mut ranked: Vec<Ranked<'a>> = candidates
        .iter()
        .filter_map(|c| {
            Some(Ranked {
                fact: c.fact,
                date: c.context.instant?,
            })
        })
        .collect();
    ranked.sort_by_key(|r| Reverse(r.date));
    ranked
}

/// Latest end date first, then longest period; facts missing either boundary
/// date are dropped. Falls back to every duration fact when none has a length
/// matching `period_type`.
fn rank_durations<'a>(candidates: &[Candidate<'a>], period_type: PeriodType) -> Vec<Ranked<'a>> {
    let dated: Vec<(Ranked<'a>, i64)> = candidates
        .iter()
        .filter_map(|c| {
            let diff = c.context.span_diff()?;
            let date = c.context.end_date?;
            Some((Ranked { fact: c.fact, date }, diff))
        })
        .collect();

    let (mut matching, other): (Vec<_>, Vec<_>) = dated
        .into_iter()
        .partition(|(_, diff)| period_type.accepts(*diff));
    if matching.is_empty() {
        matching = other;
    }

    matching.sort_by_key(|(ranked, diff)| (Reverse(ranked.date), *diff));
    matching.into_iter().map(|(ranked, _)| ranked).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::LEGAL_ENTITY_AXIS;
    use crate::testing::{InstanceBuilder, date};

    fn pull(
        doc: &FilingDocument,
        period_type: PeriodType,
        entity: EntityScope,
        element: &str,
    ) -> (Option<String>, History) {
        let accession = Accession::new("0000320193-20-000010");
        let scope = FilingScope::new(doc, entity, period_type, &accession);
        let mut history = History::new();
        let value = scope.pull(element, Some(Field::Assets), &mut history);
        (value, history)
    }

    #[test]
    fn test_missing_element_is_none() {
        let doc = InstanceBuilder::new().instant("c1", "2019-12-31").document();
        let (value, history) = pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Assets");
        assert_eq!(value, None);
        assert!(history.is_empty());
    }

    #[test]
    fn test_only_segment_facts_is_none() {
        let doc = InstanceBuilder::new()
            .context(
                "seg",
                "2019-12-31",
                &[("us-gaap:StatementBusinessSegmentsAxis", "abc:RetailMember")],
            )
            .fact("Assets", "seg", "100")
            .document();
        let (value, _) = pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Assets");
        assert_eq!(value, None);
    }

    #[test]
    fn test_empty_text_and_unknown_context_dropped() {
        let doc = InstanceBuilder::new()
            .instant("c1", "2019-12-31")
            .fact("Assets", "c1", "")
            .fact("Assets", "nowhere", "999")
            .document();
        let (value, _) = pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Assets");
        assert_eq!(value, None);
    }

    #[test]
    fn test_single_fact_returned_verbatim() {
        // A 365-day fact in a quarterly filing would fail the period filter,
        // but a single candidate skips period selection entirely.
        let doc = InstanceBuilder::new()
            .duration("fy", "2019-01-01", "2019-12-31")
            .context(
                "seg",
                ("2019-10-01", "2019-12-31"),
                &[("us-gaap:StatementGeographicalAxis", "country:US")],
            )
            .fact("Revenues", "fy", " 1.5E3 ")
            .fact("Revenues", "seg", "400")
            .document();
        let (value, history) =
            pull(&doc, PeriodType::Quarterly, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("1.5E3"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_latest_instant_wins() {
        let doc = InstanceBuilder::new()
            .instant("i2018", "2018-12-31")
            .instant("i2019", "2019-12-31")
            .fact("Assets", "i2018", "80")
            .fact("Assets", "i2019", "100")
            .document();
        let (value, history) = pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Assets");
        assert_eq!(value.as_deref(), Some("100"));

        let records = history.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field, Field::Assets);
        assert_eq!(records[0].element, "Assets");
        assert_eq!(records[0].date, date("2018-12-31"));
        assert_eq!(records[0].date_stamp(), "20181231");
        assert_eq!(records[0].value, "80");
        assert_eq!(records[0].accession.as_str(), "0000320193-20-000010");
    }

    #[test]
    fn test_annual_filter_selects_full_year() {
        let doc = InstanceBuilder::new()
            .duration("fy", "2019-01-01", "2019-12-31")
            .duration("q4", "2019-10-01", "2019-12-31")
            .fact("Revenues", "q4", "90")
            .fact("Revenues", "fy", "365")
            .document();
        let (value, history) =
            pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("365"));
        // The filtered-out quarter is not a competing candidate.
        assert!(history.is_empty());
    }

    #[test]
    fn test_quarterly_filter_selects_quarter() {
        let doc = InstanceBuilder::new()
            .duration("ytd", "2019-01-01", "2019-12-31")
            .duration("q4", "2019-10-01", "2019-12-31")
            .fact("Revenues", "ytd", "365")
            .fact("Revenues", "q4", "91")
            .document();
        let (value, _) = pull(&doc, PeriodType::Quarterly, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("91"));
    }

    #[test]
    fn test_latest_period_wins_and_prior_recorded() {
        let doc = InstanceBuilder::new()
            .duration("fy2018", "2018-01-01", "2018-12-31")
            .duration("fy2019", "2019-01-01", "2019-12-31")
            .duration("fy2017", "2017-01-01", "2017-12-31")
            .fact("Revenues", "fy2018", "200")
            .fact("Revenues", "fy2019", "300")
            .fact("Revenues", "fy2017", "100")
            .document();
        let (value, history) =
            pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("300"));

        let dates: Vec<_> = history.records().iter().map(|r| r.date_stamp()).collect();
        assert_eq!(dates, vec!["20181231", "20171231"]);
    }

    #[test]
    fn test_fallback_when_no_period_matches() {
        // Neither fact spans more than 300 days; an annual filing still
        // resolves to the latest one instead of None.
        let doc = InstanceBuilder::new()
            .duration("h1", "2019-01-01", "2019-06-30")
            .duration("h2", "2019-07-01", "2019-12-31")
            .fact("Revenues", "h1", "10")
            .fact("Revenues", "h2", "20")
            .document();
        let (value, history) =
            pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("20"));
        assert_eq!(history.len(), 1);
        assert_eq!(history.records()[0].date, date("2019-06-30"));
    }

    #[test]
    fn test_same_end_date_ranks_longest_period_first() {
        let doc = InstanceBuilder::new()
            .duration("d150", "2019-08-04", "2019-12-31")
            .duration("d200", "2019-06-15", "2019-12-31")
            .fact("Revenues", "d150", "150")
            .fact("Revenues", "d200", "200")
            .document();
        let (value, history) =
            pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("200"));
        // The shorter period is ranked second, not first.
        assert_eq!(history.records()[0].value, "150");
    }

    #[test]
    fn test_fallback_may_select_non_representative_period() {
        // Known heuristic limitation: when nothing fits the annual window the
        // fallback ranks every duration fact, so a stray short period ending
        // later beats a longer one ending earlier.
        let doc = InstanceBuilder::new()
            .duration("long", "2019-02-01", "2019-10-31")
            .duration("stray", "2019-12-01", "2019-12-31")
            .fact("Revenues", "long", "270")
            .fact("Revenues", "stray", "30")
            .document();
        let (value, _) = pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Revenues");
        assert_eq!(value.as_deref(), Some("30"));
    }

    #[test]
    fn test_typed_dimension_fact_excluded_despite_later_date() {
        let doc = InstanceBuilder::new()
            .instant("i2019", "2019-12-31")
            .typed_context(
                "forecast",
                "2020-03-31",
                "us-gaap:StatementScenarioAxis",
                "abc:ScenarioDomain",
                "Forecast",
            )
            .fact("Assets", "i2019", "100")
            .fact("Assets", "forecast", "7")
            .document();
        let (value, history) =
            pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Assets");
        assert_eq!(value.as_deref(), Some("100"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_active_scope_excludes_other_entities() {
        let doc = InstanceBuilder::new()
            .context(
                "parent_fy",
                ("2018-07-01", "2019-06-30"),
                &[("dei:LegalEntityAxis", "abc:ParentMember")],
            )
            .context(
                "sub_fy",
                ("2019-01-01", "2019-12-31"),
                &[("dei:LegalEntityAxis", "abc:SubsidiaryMember")],
            )
            .context(
                "sub_fy_prior",
                ("2018-01-01", "2018-12-31"),
                &[("dei:LegalEntityAxis", "abc:SubsidiaryMember")],
            )
            .fact("Revenues", "sub_fy", "999")
            .fact("Revenues", "sub_fy_prior", "998")
            .fact("Revenues", "parent_fy", "500")
            .document();

        let scope = EntityScope::scoped("ParentMember");
        let (value, history) = pull(&doc, PeriodType::Annual, scope, "Revenues");
        assert_eq!(value.as_deref(), Some("500"));
        assert!(history.is_empty());

        let (unscoped, _) = pull(&doc, PeriodType::Annual, EntityScope::unscoped(), "Revenues");
        assert_eq!(unscoped.as_deref(), Some("999"));
        assert_eq!(LEGAL_ENTITY_AXIS, "LegalEntityAxis");
    }

    #[test]
    fn test_no_history_without_field() {
        let doc = InstanceBuilder::new()
            .instant("i2018", "2018-12-31")
            .instant("i2019", "2019-12-31")
            .fact("Assets", "i2018", "80")
            .fact("Assets", "i2019", "100")
            .document();
        let accession = Accession::new("0000320193-20-000010");
        let scope = FilingScope::new(
            &doc,
            EntityScope::unscoped(),
            PeriodType::Annual,
            &accession,
        );
        let mut history = History::new();
        assert_eq!(scope.pull("Assets", None, &mut history).as_deref(), Some("100"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_pull_first_stops_at_first_match() {
        let doc = InstanceBuilder::new()
            .instant("i2019", "2019-12-31")
            .fact("CashAndCashEquivalentsAtCarryingValue", "i2019", "70")
            .fact("Cash", "i2019", "50")
            .document();
        let accession = Accession::new("0000320193-20-000010");
        let scope = FilingScope::new(
            &doc,
            EntityScope::unscoped(),
            PeriodType::Annual,
            &accession,
        );
        let mut history = History::new();
        let tags = vec![
            "CashAndDueFromBanks".to_string(),
            "Cash".to_string(),
            "CashAndCashEquivalentsAtCarryingValue".to_string(),
        ];
        assert_eq!(
            scope.pull_first(&tags, Some(Field::Cash), &mut history).as_deref(),
            Some("50")
        );
    }
}

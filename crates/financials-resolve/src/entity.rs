//! Entity scope for filings that report several legal entities.
//!
//! Some filers bundle the statements of several registrants (for example a
//! parent and an operating subsidiary) in one instance document, separated by
//! `LegalEntityAxis` members. [`EntityScope::detect`] finds the filer's own
//! member so resolution does not mix values across entities.

use tracing::debug;

use crate::context::ContextRecord;
use crate::document::FilingDocument;

/// Axis that separates legal entities within one filing.
pub const LEGAL_ENTITY_AXIS: &str = "LegalEntityAxis";

/// Element reporting a registrant's Central Index Key.
pub const REGISTRANT_ELEMENT: &str = "EntityCentralIndexKey";

/// The legal-entity member resolution is restricted to, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityScope {
    member: Option<String>,
}

impl EntityScope {
    /// A scope that does not narrow by entity.
    #[must_use]
    pub const fn unscoped() -> Self {
        Self { member: None }
    }

    /// A scope restricted to one `LegalEntityAxis` member.
    #[must_use]
    pub fn scoped(member: impl Into<String>) -> Self {
        Self {
            member: Some(member.into()),
        }
    }

    /// Determines the scope of a filing submitted by `registrant` (a CIK).
    ///
    /// A filing with more than one registrant identifier fact is
    /// multi-entity. The scope is the `LegalEntityAxis` member of the context
    /// of the fact whose value is the filer's CIK; without such a binding the
    /// filing stays unscoped.
    #[must_use]
    pub fn detect(document: &FilingDocument, registrant: &str) -> Self {
        let facts = document.facts(REGISTRANT_ELEMENT);
        if facts.len() <= 1 {
            return Self::unscoped();
        }

        let member = facts
            .iter()
            .find(|fact| same_registrant(&fact.value, registrant))
            .and_then(|fact| document.context_of(fact))
            .and_then(|context| context.member(LEGAL_ENTITY_AXIS));

        match member {
            Some(member) => {
                debug!(registrant, member, "Multi-entity filing, narrowing to filer");
                Self::scoped(member)
            }
            None => {
                debug!(registrant, "Multi-entity filing without filer entity member");
                Self::unscoped()
            }
        }
    }

    /// The active member, if any.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        self.member.as_deref()
    }

    /// Returns true if resolution is narrowed to one entity.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.member.is_some()
    }

    /// Returns true if a fact in `context` may be used.
    ///
    /// Contexts bound to any axis other than [`LEGAL_ENTITY_AXIS`] are
    /// segment breakdowns and never admitted. With an active scope the
    /// context's entity member must equal the scope's member.
    #[must_use]
    pub fn admits(&self, context: &ContextRecord) -> bool {
        if context.axes.keys().any(|axis| axis != LEGAL_ENTITY_AXIS) {
            return false;
        }
        match &self.member {
            Some(member) => context.member(LEGAL_ENTITY_AXIS) == Some(member.as_str()),
            None => true,
        }
    }
}

/// Compares CIKs ignoring zero padding.
fn same_registrant(a: &str, b: &str) -> bool {
    a.trim().trim_start_matches('0') == b.trim().trim_start_matches('0')
}

//! Context index.
//!
//! XBRL contexts nest their period (`period > startDate`) and express
//! dimensions as attributes on member elements. The index flattens each
//! context into a [`ContextRecord`] with explicit period fields, an axis map
//! and an open map for anything else found under the context.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use roxmltree::{Document, Node};

/// Returns the portion of `text` after its last `:`, trimmed.
pub(crate) fn last_segment(text: &str) -> &str {
    text.rsplit(':').next().unwrap_or(text).trim()
}

/// A value found under a context element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextValue {
    /// Text whose first ten characters parse as `YYYY-MM-DD`.
    Date(NaiveDate),
    /// Any other text, reduced to its last `:` segment.
    Text(String),
}

impl ContextValue {
    /// Classifies element text as a date or plain text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        text.trim()
            .get(..10)
            .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
            .map_or_else(|| Self::Text(last_segment(text).to_string()), Self::Date)
    }
}

/// Resolved attributes of one context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextRecord {
    /// Instant date, for point-in-time contexts.
    pub instant: Option<NaiveDate>,
    /// Start date, for duration contexts.
    pub start_date: Option<NaiveDate>,
    /// End date, for duration contexts.
    pub end_date: Option<NaiveDate>,
    /// Dimensional axis bindings, axis name to member name.
    pub axes: BTreeMap<String, String>,
    /// Other keyed values found under the context (e.g. `explicitMember`, `measure`).
    pub other: BTreeMap<String, ContextValue>,
}

impl ContextRecord {
    /// Assigns a keyed value. Period keys holding dates go to their dedicated
    /// field; everything else goes to `other`. Last write wins per key.
    pub fn assign(&mut self, key: &str, value: ContextValue) {
        let slot = match key {
            "instant" => &mut self.instant,
            "startDate" => &mut self.start_date,
            "endDate" => &mut self.end_date,
            _ => {
                self.other.insert(key.to_string(), value);
                return;
            }
        };
        match value {
            ContextValue::Date(date) => {
                *slot = Some(date);
                self.other.remove(key);
            }
            text @ ContextValue::Text(_) => {
                *slot = None;
                self.other.insert(key.to_string(), text);
            }
        }
    }

    /// Binds a dimensional axis to a member.
    pub fn bind_axis(&mut self, axis: &str, member: &str) {
        self.axes.insert(axis.to_string(), member.to_string());
    }

    /// Member bound to `axis`, if any.
    #[must_use]
    pub fn member(&self, axis: &str) -> Option<&str> {
        self.axes.get(axis).map(String::as_str)
    }

    /// Returns true if this is a point-in-time context.
    #[must_use]
    pub const fn is_instant(&self) -> bool {
        self.instant.is_some()
    }

    /// `start - end` in days; more negative means a longer period.
    ///
    /// `None` unless both boundary dates are present.
    #[must_use]
    pub fn span_diff(&self) -> Option<i64> {
        let start = self.start_date?;
        let end = self.end_date?;
        Some(start.signed_duration_since(end).num_days())
    }

    /// Returns true if nothing was recorded for this context.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instant.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.axes.is_empty()
            && self.other.is_empty()
    }
}

/// Mapping from context identifier to its resolved attributes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextIndex {
    contexts: HashMap<String, ContextRecord>,
}

impl ContextIndex {
    /// Scans the document and records every element carrying an `id`
    /// attribute as a context root.
    ///
    /// For each descendant with non-empty text (skipping `identifier`
    /// elements) the descendant's local name becomes a key. Descendants with
    /// attributes other than a lone `scheme` also bind each attribute value
    /// to the descendant's text, which captures explicit dimension members.
    /// A typed member has no text of its own; its `dimension` is bound to the
    /// text of its first valued child element.
    #[must_use]
    pub fn build(doc: &Document<'_>) -> Self {
        let mut contexts: HashMap<String, ContextRecord> = HashMap::new();

        for root in doc.descendants().filter(Node::is_element) {
            let Some(id) = root.attribute("id") else {
                continue;
            };
            let record = contexts.entry(id.trim().to_string()).or_default();
            for node in root.descendants().skip(1).filter(Node::is_element) {
                record_descendant(record, node);
            }
        }

        contexts.retain(|_, record| !record.is_empty());
        Self { contexts }
    }

    /// Context with the given identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ContextRecord> {
        self.contexts.get(id)
    }

    /// Number of contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    /// Returns true if the document declared no contexts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }

    /// Iterates over `(id, record)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextRecord)> {
        self.contexts.iter().map(|(id, record)| (id.as_str(), record))
    }
}

fn record_descendant(record: &mut ContextRecord, node: Node<'_, '_>) {
    let Some(text) = node.text().filter(|t| !t.trim().is_empty()) else {
        bind_typed_member(record, node);
        return;
    };
    let key = node.tag_name().name().trim();
    if key.contains("identifier") {
        return;
    }
    record.assign(key, ContextValue::parse(text));

    let attributes: Vec<_> = node.attributes().collect();
    match attributes.as_slice() {
        [] => return,
        [only] if only.name() == "scheme" => return,
        _ => {}
    }
    let member = last_segment(text);
    for attribute in &attributes {
        record.bind_axis(last_segment(attribute.value()), member);
    }
}

fn bind_typed_member(record: &mut ContextRecord, node: Node<'_, '_>) {
    let Some(dimension) = node.attribute("dimension") else {
        return;
    };
    let value = node
        .children()
        .filter(Node::is_element)
        .find_map(|child| child.text().filter(|t| !t.trim().is_empty()));
    if let Some(value) = value {
        record.bind_axis(last_segment(dimension), last_segment(value));
    }
}

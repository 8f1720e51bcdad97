//! Instance document parsing and fact indexing.

use std::collections::HashMap;

use financials_core::{FinancialsError, Result};
use roxmltree::{Document, ParsingOptions};
use tracing::debug;

use crate::context::{ContextIndex, ContextRecord, ContextValue, last_segment};

/// One tagged value in an instance document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fact {
    /// Element local name, namespace stripped (e.g. `Assets`).
    pub element: String,
    /// Text value after the last `:`, trimmed. Empty if the element had no text.
    pub value: String,
    /// Identifier of the context the fact is reported in.
    pub context_ref: String,
}

/// Parses raw instance document text into an XML tree.
///
/// # Errors
/// Returns [`FinancialsError::Parse`] if the text is not well-formed XML.
pub fn parse_xml(text: &str) -> Result<Document<'_>> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(text, options)
        .map_err(|e| FinancialsError::Parse(format!("Failed to parse instance document: {}", e)))
}

/// Facts of a document grouped by element local name, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactIndex {
    facts: HashMap<String, Vec<Fact>>,
    order: Vec<(String, usize)>,
}

impl FactIndex {
    /// Indexes every element that carries a `contextRef` attribute.
    #[must_use]
    pub fn build(doc: &Document<'_>) -> Self {
        let mut facts: HashMap<String, Vec<Fact>> = HashMap::new();
        let mut order = Vec::new();

        for node in doc.descendants().filter(|n| n.is_element()) {
            let Some(context_ref) = node.attribute("contextRef") else {
                continue;
            };
            let element = node.tag_name().name();
            let value = node.text().map(last_segment).unwrap_or_default();
            let group = facts.entry(element.to_string()).or_default();
            order.push((element.to_string(), group.len()));
            group.push(Fact {
                element: element.to_string(),
                value: value.to_string(),
                context_ref: context_ref.trim().to_string(),
            });
        }

        Self { facts, order }
    }

    /// Every fact in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Fact> {
        self.order
            .iter()
            .filter_map(|(element, at)| self.facts.get(element)?.get(*at))
    }

    /// All facts reported under `element`, matched by local name.
    #[must_use]
    pub fn get(&self, element: &str) -> &[Fact] {
        self.facts.get(element).map(Vec::as_slice).unwrap_or_default()
    }

    /// Number of distinct element names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if the document contained no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

/// A parsed instance document: its facts and its context index.
///
/// Built once per filing and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilingDocument {
    facts: FactIndex,
    contexts: ContextIndex,
}

impl FilingDocument {
    /// Parses instance document text and builds both indexes.
    ///
    /// # Errors
    /// Returns [`FinancialsError::Parse`] if the text is not well-formed XML.
    pub fn parse(text: &str) -> Result<Self> {
        let doc = parse_xml(text)?;
        Ok(Self::from_tree(&doc))
    }

    /// Builds both indexes from an already parsed tree.
    #[must_use]
    pub fn from_tree(doc: &Document<'_>) -> Self {
        let facts = FactIndex::build(doc);
        let contexts = ContextIndex::build(doc);
        debug!(
            elements = facts.len(),
            contexts = contexts.len(),
            "Indexed instance document"
        );
        Self { facts, contexts }
    }

    /// Facts reported under `element`.
    #[must_use]
    pub fn facts(&self, element: &str) -> &[Fact] {
        self.facts.get(element)
    }

    /// The context index.
    #[must_use]
    pub const fn contexts(&self) -> &ContextIndex {
        &self.contexts
    }

    /// Context a fact is reported in, if its identifier resolves.
    #[must_use]
    pub fn context_of(&self, fact: &Fact) -> Option<&ContextRecord> {
        self.contexts.get(&fact.context_ref)
    }

    /// Every valued fact in document order, paired with its context.
    ///
    /// Facts with empty text and `explicitMember` elements are skipped.
    pub fn iter_facts(&self) -> impl Iterator<Item = (&Fact, Option<&ContextRecord>)> {
        self.facts
            .iter()
            .filter(|fact| !fact.value.is_empty() && fact.element != "explicitMember")
            .map(|fact| (fact, self.context_of(fact)))
    }

    /// Facts from [`iter_facts`](Self::iter_facts) whose element name, value
    /// or context values contain `needle`, ignoring case.
    #[must_use]
    pub fn search(&self, needle: &str) -> Vec<(&Fact, Option<&ContextRecord>)> {
        let needle = needle.to_lowercase();
        self.iter_facts()
            .filter(|(fact, context)| mentions(fact, *context, &needle))
            .collect()
    }
}

fn mentions(fact: &Fact, context: Option<&ContextRecord>, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);
    if contains(&fact.element) || contains(&fact.value) {
        return true;
    }
    let Some(context) = context else {
        return false;
    };
    [context.instant, context.start_date, context.end_date]
        .into_iter()
        .flatten()
        .any(|date| contains(&date.to_string()))
        || context.axes.values().any(|member| contains(member))
        || context.other.values().any(|value| match value {
            ContextValue::Date(date) => contains(&date.to_string()),
            ContextValue::Text(text) => contains(text),
        })
}

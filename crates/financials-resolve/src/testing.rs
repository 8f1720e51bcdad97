//! Instance document fixtures for unit tests.

use chrono::NaiveDate;

use crate::document::FilingDocument;

pub(crate) fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Period of a fixture context.
pub(crate) enum PeriodSpec {
    Instant(String),
    Duration(String, String),
}

impl From<&str> for PeriodSpec {
    fn from(instant: &str) -> Self {
        Self::Instant(instant.to_string())
    }
}

impl From<(&str, &str)> for PeriodSpec {
    fn from((start, end): (&str, &str)) -> Self {
        Self::Duration(start.to_string(), end.to_string())
    }
}

/// Builds small XBRL instance documents.
#[derive(Default)]
pub(crate) struct InstanceBuilder {
    cik: String,
    contexts: Vec<String>,
    facts: Vec<String>,
}

impl InstanceBuilder {
    pub(crate) fn new() -> Self {
        Self {
            cik: "0000320193".to_string(),
            ..Default::default()
        }
    }

    pub(crate) fn instant(self, id: &str, instant: &str) -> Self {
        self.context(id, instant, &[])
    }

    pub(crate) fn duration(self, id: &str, start: &str, end: &str) -> Self {
        self.context(id, (start, end), &[])
    }

    /// Adds a context; `axes` are `(dimension, member)` QName pairs.
    pub(crate) fn context(
        self,
        id: &str,
        period: impl Into<PeriodSpec>,
        axes: &[(&str, &str)],
    ) -> Self {
        let members: String = axes
            .iter()
            .map(|(axis, member)| {
                format!(
                    "<xbrldi:explicitMember dimension=\"{}\">{}</xbrldi:explicitMember>",
                    axis, member
                )
            })
            .collect();
        self.push_context(id, period.into(), &members)
    }

    /// Adds a context qualified by one typed dimension whose value sits in
    /// a `domain` child element.
    pub(crate) fn typed_context(
        self,
        id: &str,
        period: impl Into<PeriodSpec>,
        axis: &str,
        domain: &str,
        value: &str,
    ) -> Self {
        let member = format!(
            "<xbrldi:typedMember dimension=\"{axis}\">\n  <{domain}>{value}</{domain}>\n</xbrldi:typedMember>"
        );
        self.push_context(id, period.into(), &member)
    }

    fn push_context(mut self, id: &str, period: PeriodSpec, members: &str) -> Self {
        let segment = if members.is_empty() {
            String::new()
        } else {
            format!("<xbrli:segment>{}</xbrli:segment>", members)
        };
        let period = match period {
            PeriodSpec::Instant(instant) => {
                format!("<xbrli:instant>{}</xbrli:instant>", instant)
            }
            PeriodSpec::Duration(start, end) => format!(
                "<xbrli:startDate>{}</xbrli:startDate><xbrli:endDate>{}</xbrli:endDate>",
                start, end
            ),
        };
        self.contexts.push(format!(
            "<xbrli:context id=\"{id}\">\
               <xbrli:entity>\
                 <xbrli:identifier scheme=\"http://www.sec.gov/CIK\">{cik}</xbrli:identifier>\
                 {segment}\
               </xbrli:entity>\
               <xbrli:period>{period}</xbrli:period>\
             </xbrli:context>",
            cik = self.cik,
        ));
        self
    }

    /// Adds a fact; unprefixed names are placed in `us-gaap`.
    pub(crate) fn fact(mut self, name: &str, context: &str, value: &str) -> Self {
        let name = if name.contains(':') {
            name.to_string()
        } else {
            format!("us-gaap:{}", name)
        };
        self.facts.push(format!(
            "<{name} contextRef=\"{context}\" unitRef=\"usd\" decimals=\"-6\">{value}</{name}>"
        ));
        self
    }

    pub(crate) fn build(&self) -> String {
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <xbrli:xbrl xmlns:xbrli=\"http://www.xbrl.org/2003/instance\" \
               xmlns:xbrldi=\"http://xbrl.org/2006/xbrldi\" \
               xmlns:iso4217=\"http://www.xbrl.org/2003/iso4217\" \
               xmlns:us-gaap=\"http://fasb.org/us-gaap/2019-01-31\" \
               xmlns:ifrs-full=\"http://xbrl.ifrs.org/taxonomy/2019-03-27/ifrs-full\" \
               xmlns:dei=\"http://xbrl.sec.gov/dei/2019-01-31\" \
               xmlns:abc=\"http://example.com/abc/20191231\">\n\
             {}\n\
             <xbrli:unit id=\"usd\"><xbrli:measure>iso4217:USD</xbrli:measure></xbrli:unit>\n\
             {}\n\
             </xbrli:xbrl>",
            self.contexts.join("\n"),
            self.facts.join("\n"),
        )
    }

    pub(crate) fn document(&self) -> FilingDocument {
        FilingDocument::parse(&self.build()).unwrap()
    }
}

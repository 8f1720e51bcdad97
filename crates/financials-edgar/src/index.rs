//! Parsing of EDGAR index payloads.

use financials_core::Filing;
use tracing::warn;

/// Linkbase suffixes that share the `.xml` extension with instance documents.
const LINKBASE_SUFFIXES: &[&str] = &["_cal.xml", "_def.xml", "_lab.xml", "_pre.xml", "_ref.xml"];

/// Parses a quarterly `xbrl.idx` file.
///
/// Everything up to the dashed separator line is header. Rows that do not
/// parse are logged and skipped; rows for non-periodic forms are dropped.
pub fn parse_quarter_index(text: &str) -> Vec<Filing> {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|line| line.starts_with("---"))
        .map_or(0, |separator| separator + 1);

    lines[start..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match Filing::from_index_line(line) {
            Ok(filing) => Some(filing),
            Err(e) => {
                warn!("Skipping index line: {}", e);
                None
            }
        })
        .filter(Filing::is_periodic_report)
        .collect()
}

/// Picks the XBRL instance document out of a filing directory listing.
///
/// Inline XBRL filings carry an extracted instance named `*_htm.xml`, which
/// is preferred. Otherwise the first `.xml` file that is neither a linkbase,
/// a schema nor `FilingSummary.xml` is chosen.
pub fn select_instance(names: &[String]) -> Option<&str> {
    let candidates: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| is_instance_candidate(name))
        .collect();

    candidates
        .iter()
        .find(|name| name.to_ascii_lowercase().ends_with("_htm.xml"))
        .or_else(|| candidates.first())
        .copied()
}

fn is_instance_candidate(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".xml")
        && lower != "filingsummary.xml"
        && !LINKBASE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
}

//! Structural heuristics over a finished report.
//!
//! Exact-substring header matching: advisory only, a report that renames a
//! section ("Key findings") fails the check.

use regex::Regex;
use std::sync::LazyLock;

use super::CheckMap;

pub const EXECUTIVE_SUMMARY_HEADER: &str = "1. Executive Summary";
pub const KEY_FINDINGS_HEADER: &str = "2. Key Findings";
pub const ANALYSIS_HEADER: &str = "3. Analysis";
pub const ANALYSIS_LONG_HEADER: &str = "3. Analysis / Discussion";
pub const LIMITATIONS_HEADER: &str = "4. Limitations";
pub const SOURCES_HEADER: &str = "5. Sources";

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("citation pattern is valid"));

pub fn eval_structure(report: &str) -> CheckMap {
    let has_analysis = report.contains(ANALYSIS_HEADER) || report.contains(ANALYSIS_LONG_HEADER);
    let has_all_sections = report.contains(EXECUTIVE_SUMMARY_HEADER)
        && report.contains(KEY_FINDINGS_HEADER)
        && has_analysis
        && report.contains(LIMITATIONS_HEADER)
        && report.contains(SOURCES_HEADER);

    CheckMap::from([
        ("has_all_sections".to_string(), has_all_sections),
        ("has_citations".to_string(), has_citations(report)),
        ("has_urls_in_sources".to_string(), has_http_in_sources(report)),
    ])
}

pub fn has_citations(report: &str) -> bool {
    CITATION_RE.is_match(report)
}

/// True when "http" occurs after the first Sources header.
pub fn has_http_in_sources(report: &str) -> bool {
    report
        .split_once(SOURCES_HEADER)
        .is_some_and(|(_, rest)| rest.contains("http"))
}

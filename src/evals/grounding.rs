//! Grounding heuristics: does the report talk about the query and cite
//! linked sources.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use super::structure::{has_http_in_sources, SOURCES_HEADER};
use super::CheckMap;

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+").expect("word pattern is valid"));

/// Lower-cased alphabetic words of the query longer than three letters.
pub fn query_keywords(query: &str) -> BTreeSet<String> {
    let lowered = query.to_lowercase();
    WORD_RE
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|word| word.len() > 3)
        .map(str::to_string)
        .collect()
}

pub fn eval_grounding(report: &str, query: &str) -> CheckMap {
    let keywords = query_keywords(query);
    let lowered = report.to_lowercase();
    let mentions_query_keywords =
        keywords.is_empty() || keywords.iter().any(|k| lowered.contains(k.as_str()));

    CheckMap::from([
        ("mentions_query_keywords".to_string(), mentions_query_keywords),
        ("has_sources_section".to_string(), report.contains(SOURCES_HEADER)),
        ("has_http_in_sources".to_string(), has_http_in_sources(report)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_drop_short_words() {
        let keywords = query_keywords("What is the impact of AI on jobs in 2030?");
        let expected: BTreeSet<String> = ["impact", "jobs", "what"].iter().map(|s| s.to_string()).collect();
        assert_eq!(keywords, expected);
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let checks = eval_grounding("GRAPHENE production costs dropped.", "graphene manufacturing");
        assert!(checks["mentions_query_keywords"]);
    }

    #[test]
    fn test_no_keyword_match() {
        let checks = eval_grounding("An unrelated essay.", "graphene manufacturing");
        assert!(!checks["mentions_query_keywords"]);
    }

    #[test]
    fn test_empty_keyword_set_passes_vacuously() {
        let checks = eval_grounding("anything", "is AI ok? 42");
        assert!(checks["mentions_query_keywords"]);
    }

    #[test]
    fn test_sources_checks() {
        let checks = eval_grounding("Body\n5. Sources\n1. http://a.example", "body text");
        assert!(checks["has_sources_section"]);
        assert!(checks["has_http_in_sources"]);

        let checks = eval_grounding("Body http://a.example", "body text");
        assert!(!checks["has_sources_section"]);
        assert!(!checks["has_http_in_sources"]);
    }
}

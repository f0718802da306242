//! Keyword-rule matching, the high-trust path of the hybrid mapper.

use crate::config::{default_keyword_rules, KeywordRule};

/// File extensions stripped before matching.
pub(crate) const KNOWN_EXTENSIONS: &[&str] = &[".csv", ".json", ".xlsx", ".xls"];

/// Base confidence of a single keyword hit.
const BASE_SCORE: f64 = 0.7;

/// Confidence added per additional keyword hit.
const PER_MATCH_SCORE: f64 = 0.1;

/// Rule scores never exceed this.
const MAX_SCORE: f64 = 0.95;

/// Matches names against a curated keyword dictionary.
///
/// Any positive match scores at least 0.7; the hybrid mapper's high threshold
/// relies on that floor.
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    rules: Vec<KeywordRule>,
}

impl Default for RuleMatcher {
    fn default() -> Self {
        Self::new(default_keyword_rules())
    }
}

impl RuleMatcher {
    /// Create a matcher over `rules`, in tie-break order.
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| KeywordRule {
                class: rule.class,
                keywords: rule
                    .keywords
                    .into_iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect(),
            })
            .collect();
        Self { rules }
    }

    /// Normalized form used for rule matching.
    ///
    /// Strips a known extension, turns digits, underscores and hyphens into
    /// spaces, lowercases and collapses whitespace.
    pub fn normalize(&self, text: &str) -> String {
        let stem = strip_extension(text);
        let spaced: String = stem
            .chars()
            .map(|c| {
                if c == '_' || c == '-' || c.is_ascii_digit() {
                    ' '
                } else {
                    c
                }
            })
            .collect();

        spaced
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Best class for `text` with its confidence, or `None` when no keyword hits.
    pub fn match_text(&self, text: &str) -> Option<(String, f64)> {
        let clean = self.normalize(text);
        let tokens: Vec<&str> = clean.split(' ').filter(|t| !t.is_empty()).collect();

        let mut best: Option<(&str, f64)> = None;

        for rule in &self.rules {
            let matches = rule
                .keywords
                .iter()
                .filter(|kw| {
                    clean.contains(kw.as_str()) || tokens.iter().any(|t| t.contains(kw.as_str()))
                })
                .count();

            if matches == 0 {
                continue;
            }

            let score = score_for(matches);
            // Strictly greater: the first declared class keeps ties.
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((rule.class.as_str(), score));
            }
        }

        best.map(|(class, score)| (class.to_string(), score))
    }

    /// Classes this matcher knows keywords for.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.class.as_str())
    }
}

/// Remove one known extension suffix, case-insensitively.
pub(crate) fn strip_extension(text: &str) -> &str {
    let lower = text.to_ascii_lowercase();
    KNOWN_EXTENSIONS
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map(|ext| &text[..text.len() - ext.len()])
        .unwrap_or(text)
}

fn score_for(matches: usize) -> f64 {
    let raw = BASE_SCORE + PER_MATCH_SCORE * matches as f64;
    (raw.min(MAX_SCORE) * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let matcher = RuleMatcher::default();
        assert_eq!(
            matcher.normalize("Injection_Molding-Line3.csv"),
            "injection molding line"
        );
        assert_eq!(matcher.normalize("  pump__02  .CSV"), "pump");
        assert_eq!(matcher.normalize("data.json"), "data");
    }

    #[test]
    fn test_match_injection() {
        let matcher = RuleMatcher::default();
        let (class, score) = matcher.match_text("injection_molding_line3.csv").unwrap();
        assert_eq!(class, "Injection_Molding_Machine");
        assert!(score >= 0.7);
        assert!(score <= 0.95);
    }

    #[test]
    fn test_score_grows_with_matches() {
        let matcher = RuleMatcher::default();
        let (_, one) = matcher.match_text("pump.csv").unwrap();
        let (_, two) = matcher.match_text("pump_pressure.csv").unwrap();
        assert_eq!(one, 0.8);
        assert_eq!(two, 0.9);
    }

    #[test]
    fn test_korean_keyword() {
        let matcher = RuleMatcher::default();
        let (class, _) = matcher.match_text("용접_라인_01.csv").unwrap();
        assert_eq!(class, "Welding_Robot");
    }

    #[test]
    fn test_no_match() {
        let matcher = RuleMatcher::default();
        assert!(matcher.match_text("xyz_unrelated_42.csv").is_none());
    }

    #[test]
    fn test_tie_goes_to_first_declared() {
        let matcher = RuleMatcher::new(vec![
            KeywordRule {
                class: "First".to_string(),
                keywords: vec!["shared".to_string()],
            },
            KeywordRule {
                class: "Second".to_string(),
                keywords: vec!["shared".to_string()],
            },
        ]);
        let (class, _) = matcher.match_text("shared_sensor.csv").unwrap();
        assert_eq!(class, "First");
    }

    #[test]
    fn test_score_is_capped() {
        let matcher = RuleMatcher::default();
        let (_, score) = matcher
            .match_text("injection_molding_moulding_plastic.csv")
            .unwrap();
        assert_eq!(score, 0.95);
    }
}

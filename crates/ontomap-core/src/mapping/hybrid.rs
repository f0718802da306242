//! Rule → semantic → unclassified decision chain.

use std::sync::Arc;

use crate::config::{MappingConfig, DEFAULT_HIGH_CONFIDENCE, DEFAULT_MEDIUM_CONFIDENCE};

use super::embedder::Embedder;
use super::error::MappingError;
use super::rules::RuleMatcher;
use super::semantic::{SemanticMatch, SemanticMatcher};
use super::{MappingMethod, MappingResult, UNCLASSIFIED};

/// Acceptance thresholds for the two real strategies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum rule confidence.
    pub high: f64,
    /// Minimum semantic confidence.
    pub medium: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: DEFAULT_HIGH_CONFIDENCE,
            medium: DEFAULT_MEDIUM_CONFIDENCE,
        }
    }
}

impl From<&MappingConfig> for Thresholds {
    fn from(config: &MappingConfig) -> Self {
        Self {
            high: config.high_confidence,
            medium: config.medium_confidence,
        }
    }
}

/// Maps names to one of a session's ontology classes.
///
/// Decisions are per item; batching only shares the embedding call.
pub struct HybridMapper {
    rules: RuleMatcher,
    semantic: SemanticMatcher,
    classes: Vec<String>,
    thresholds: Thresholds,
}

impl HybridMapper {
    /// Create a mapper with the built-in keyword rules and default thresholds.
    pub fn new(classes: Vec<String>, embedder: Arc<dyn Embedder>) -> Result<Self, MappingError> {
        if classes.is_empty() {
            return Err(MappingError::EmptyClasses);
        }

        Ok(Self {
            rules: RuleMatcher::default(),
            semantic: SemanticMatcher::new(embedder),
            classes,
            thresholds: Thresholds::default(),
        })
    }

    /// Create a mapper configured from `config` (rules and thresholds).
    pub fn from_config(
        classes: Vec<String>,
        embedder: Arc<dyn Embedder>,
        config: &MappingConfig,
    ) -> Result<Self, MappingError> {
        Ok(Self::new(classes, embedder)?
            .with_rules(RuleMatcher::new(config.rules.clone()))
            .with_thresholds(Thresholds::from(config)))
    }

    /// Replace the keyword rules.
    pub fn with_rules(mut self, rules: RuleMatcher) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the acceptance thresholds.
    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// The session's class list.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Map a single name.
    pub fn map_one(&self, text: &str) -> Result<MappingResult, MappingError> {
        if let Some(result) = self.try_rules(text) {
            return Ok(result);
        }

        let semantic = self.semantic.map_batch(&[text.to_string()], &self.classes)?;
        Ok(match semantic.into_iter().next() {
            Some(m) => self.decide_semantic(text, m),
            None => self.unclassified(text),
        })
    }

    /// Map many names, preserving input order.
    ///
    /// Names the rules cannot place are embedded together in one batch.
    pub fn map_many(&self, texts: &[String]) -> Result<Vec<MappingResult>, MappingError> {
        let mut results: Vec<Option<MappingResult>> =
            texts.iter().map(|t| self.try_rules(t)).collect();

        let pending: Vec<usize> = results
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none())
            .map(|(i, _)| i)
            .collect();

        if !pending.is_empty() {
            let batch: Vec<String> = pending.iter().map(|&i| texts[i].clone()).collect();
            let matches = self.semantic.map_batch(&batch, &self.classes)?;
            for (idx, m) in pending.into_iter().zip(matches) {
                results[idx] = Some(self.decide_semantic(&texts[idx], m));
            }
        }

        Ok(results
            .into_iter()
            .zip(texts)
            .map(|(r, text)| r.unwrap_or_else(|| self.unclassified(text)))
            .collect())
    }

    fn try_rules(&self, text: &str) -> Option<MappingResult> {
        let (class, confidence) = self.rules.match_text(text)?;
        if confidence < self.thresholds.high {
            return None;
        }

        tracing::debug!(text, class = %class, confidence, "rule match");
        Some(MappingResult {
            source_text: text.to_string(),
            mapped_class: class,
            confidence,
            method: MappingMethod::Rule,
            interpreted_as: self.rules.normalize(text),
        })
    }

    fn decide_semantic(&self, text: &str, m: SemanticMatch) -> MappingResult {
        if m.confidence >= self.thresholds.medium {
            tracing::debug!(text, class = %m.mapped_class, confidence = m.confidence, "semantic match");
            return MappingResult {
                source_text: text.to_string(),
                mapped_class: m.mapped_class,
                confidence: m.confidence,
                method: MappingMethod::Semantic,
                interpreted_as: m.interpreted_as,
            };
        }

        tracing::debug!(text, best = m.confidence, "no strategy above threshold");
        self.unclassified(text)
    }

    /// The fallback reports the rule normalization, not the semantic one.
    fn unclassified(&self, text: &str) -> MappingResult {
        MappingResult {
            source_text: text.to_string(),
            mapped_class: UNCLASSIFIED.to_string(),
            confidence: 0.0,
            method: MappingMethod::Unclassified,
            interpreted_as: self.rules.normalize(text),
        }
    }
}

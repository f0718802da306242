//! Embedding-similarity matching.

use std::sync::Arc;

use super::embedder::Embedder;
use super::error::MappingError;
use super::rules::strip_extension;

/// Best class for one text under the semantic strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticMatch {
    /// Input text.
    pub text: String,
    /// Normalized form that was embedded.
    pub interpreted_as: String,
    /// Class with the highest similarity.
    pub mapped_class: String,
    /// Raw cosine similarity, rounded to three decimals. Not clamped.
    pub confidence: f64,
}

/// Picks the class whose label embedding is closest to each text.
pub struct SemanticMatcher {
    embedder: Arc<dyn Embedder>,
}

impl SemanticMatcher {
    /// Create a matcher over an already loaded embedder.
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Normalized form used for embedding: extension removed, separators
    /// replaced by spaces, case preserved.
    pub fn normalize(text: &str) -> String {
        strip_extension(text)
            .replace(['_', '-'], " ")
            .trim()
            .to_string()
    }

    /// Map every text against `classes`, embedding all texts in one batch.
    ///
    /// Ties keep the first class in `classes` order.
    pub fn map_batch(
        &self,
        texts: &[String],
        classes: &[String],
    ) -> Result<Vec<SemanticMatch>, MappingError> {
        if classes.is_empty() {
            return Err(MappingError::EmptyClasses);
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let clean: Vec<String> = texts.iter().map(|t| Self::normalize(t)).collect();
        let text_vectors = self.embed_checked(&clean)?;
        let class_vectors = self.embed_checked(classes)?;

        let matches = texts
            .iter()
            .zip(clean)
            .zip(&text_vectors)
            .map(|((text, interpreted_as), vector)| {
                let mut best_idx = 0;
                let mut best_score = f32::NEG_INFINITY;
                for (idx, class_vector) in class_vectors.iter().enumerate() {
                    let score = cosine_similarity(vector, class_vector);
                    if score > best_score {
                        best_score = score;
                        best_idx = idx;
                    }
                }

                SemanticMatch {
                    text: text.clone(),
                    interpreted_as,
                    mapped_class: classes[best_idx].clone(),
                    confidence: round3(best_score as f64),
                }
            })
            .collect();

        Ok(matches)
    }

    fn embed_checked(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
        let vectors = self.embedder.embed(texts)?;
        if vectors.len() != texts.len() {
            return Err(MappingError::EmbeddingCount {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

/// Cosine similarity of two vectors; 0.0 when either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Embeds each text as a bag of the words it shares with a fixed vocabulary.
    struct VocabEmbedder {
        vocab: Vec<&'static str>,
    }

    impl Embedder for VocabEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
            Ok(texts
                .iter()
                .map(|t| {
                    let lower = t.to_lowercase();
                    self.vocab
                        .iter()
                        .map(|w| if lower.contains(w) { 1.0 } else { 0.0 })
                        .collect()
                })
                .collect())
        }

        fn dimension(&self) -> usize {
            self.vocab.len()
        }

        fn model_name(&self) -> &str {
            "vocab"
        }
    }

    fn matcher() -> SemanticMatcher {
        SemanticMatcher::new(Arc::new(VocabEmbedder {
            vocab: vec!["hydraulic", "press", "paint", "booth"],
        }))
    }

    #[test]
    fn test_normalize_preserves_case() {
        assert_eq!(
            SemanticMatcher::normalize("Hydraulic_Press-Log.csv"),
            "Hydraulic Press Log"
        );
    }

    #[test]
    fn test_picks_most_similar_class() {
        let classes = vec!["Paint_Booth".to_string(), "Hydraulic_Press".to_string()];
        let results = matcher()
            .map_batch(&["hydraulic_press_log.csv".to_string()], &classes)
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].mapped_class, "Hydraulic_Press");
        assert_eq!(results[0].interpreted_as, "hydraulic press log");
        assert_eq!(results[0].confidence, 1.0);
    }

    #[test]
    fn test_batch_preserves_order() {
        let classes = vec!["Paint_Booth".to_string(), "Hydraulic_Press".to_string()];
        let texts = vec!["press_a.csv".to_string(), "booth_b.csv".to_string()];
        let results = matcher().map_batch(&texts, &classes).unwrap();

        assert_eq!(results[0].text, "press_a.csv");
        assert_eq!(results[0].mapped_class, "Hydraulic_Press");
        assert_eq!(results[1].mapped_class, "Paint_Booth");
    }

    #[test]
    fn test_empty_classes_is_an_error() {
        let result = matcher().map_batch(&["x.csv".to_string()], &[]);
        assert!(matches!(result, Err(MappingError::EmptyClasses)));
    }

    #[test]
    fn test_zero_vectors_do_not_produce_nan() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_negative_similarity_is_not_clamped() {
        assert!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]) < 0.0);
    }
}

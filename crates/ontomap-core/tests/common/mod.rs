#![allow(dead_code)]

use std::sync::Arc;

use ontomap_core::mapping::{Embedder, EmbedderCache, MappingError};
use ontomap_core::{Config, OntologyService};

/// Places every normalized text at a fixed cosine similarity to every class.
///
/// Class labels are recognised by their underscores; the semantic matcher
/// replaces underscores in texts before embedding.
pub struct FlatEmbedder {
    pub similarity: f32,
}

impl Embedder for FlatEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
        let s = self.similarity;
        Ok(texts
            .iter()
            .map(|t| {
                if t.contains('_') {
                    vec![1.0, 0.0]
                } else {
                    vec![s, (1.0 - s * s).sqrt()]
                }
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        2
    }

    fn model_name(&self) -> &str {
        "flat"
    }
}

/// Letter-frequency vectors: deterministic and sensitive to spelling.
pub struct LetterEmbedder;

impl Embedder for LetterEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
        Ok(texts
            .iter()
            .map(|t| {
                let mut v = vec![0.0f32; 26];
                for c in t.to_ascii_lowercase().bytes() {
                    if c.is_ascii_lowercase() {
                        v[(c - b'a') as usize] += 1.0;
                    }
                }
                v
            })
            .collect())
    }

    fn dimension(&self) -> usize {
        26
    }

    fn model_name(&self) -> &str {
        "letters"
    }
}

pub fn classes(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn service_with(embedder: Arc<dyn Embedder>, config: Config) -> OntologyService {
    OntologyService::with_embedders(config, EmbedderCache::fixed(embedder))
}

pub fn flat_service(similarity: f32) -> OntologyService {
    service_with(Arc::new(FlatEmbedder { similarity }), Config::default())
}

//! Hybrid mapping of dataset names onto ontology classes.
//!
//! Three strategies are chained, first acceptance wins:
//! - **Rules** ([`RuleMatcher`]): curated keyword dictionary, confidence 0.7..=0.95
//! - **Semantic** ([`SemanticMatcher`]): cosine similarity of sentence embeddings
//! - **Unclassified**: sentinel class with confidence 0.0
//!
//! # Example
//!
//! ```ignore
//! use ontomap_core::mapping::{HybridMapper, FastEmbedder};
//!
//! let embedder = Arc::new(FastEmbedder::load(DEFAULT_MODEL, cache_dir)?);
//! let mapper = HybridMapper::new(vec!["Welding_Robot".into()], embedder)?;
//! let result = mapper.map_one("weld_line_2.csv")?;
//! ```

mod embedder;
mod error;
mod hybrid;
mod rules;
mod semantic;

pub use embedder::{resolve_model, Embedder, EmbedderCache, FastEmbedder};
pub use error::MappingError;
pub use hybrid::{HybridMapper, Thresholds};
pub use rules::RuleMatcher;
pub use semantic::{cosine_similarity, SemanticMatch, SemanticMatcher};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel class for names no strategy could place.
pub const UNCLASSIFIED: &str = "Unclassified";

/// How a mapping decision was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMethod {
    /// Keyword dictionary hit.
    Rule,
    /// Embedding similarity above the medium threshold.
    Semantic,
    /// No strategy reached its threshold.
    Unclassified,
    /// Class read directly from a target column of the uploaded table.
    Direct,
}

impl MappingMethod {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingMethod::Rule => "rule",
            MappingMethod::Semantic => "semantic",
            MappingMethod::Unclassified => "unclassified",
            MappingMethod::Direct => "direct",
        }
    }
}

impl fmt::Display for MappingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of mapping one name.
///
/// For [`MappingMethod::Semantic`] the confidence is the raw cosine similarity
/// rounded to three decimals, so a degenerate model can yield negative values.
/// Every other method stays within `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingResult {
    /// Name as supplied by the caller.
    pub source_text: String,
    /// Chosen class, or [`UNCLASSIFIED`].
    pub mapped_class: String,
    /// Decision confidence.
    pub confidence: f64,
    /// Strategy that produced the decision.
    pub method: MappingMethod,
    /// Normalized form the deciding strategy matched on.
    pub interpreted_as: String,
}

impl MappingResult {
    /// Whether a real class was assigned.
    pub fn is_classified(&self) -> bool {
        self.method != MappingMethod::Unclassified
    }
}

//! Mapping error types.

use thiserror::Error;

/// Errors that can occur while mapping names to ontology classes.
#[derive(Debug, Error)]
pub enum MappingError {
    /// No ontology classes were supplied.
    #[error("At least one ontology class is required")]
    EmptyClasses,

    /// Embedding generation error.
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// The model returned a different number of vectors than inputs.
    #[error("Embedding count mismatch: expected {expected}, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },

    /// The configured model name is not a known embedding model.
    #[error("Unknown embedding model: {0}")]
    UnknownModel(String),
}

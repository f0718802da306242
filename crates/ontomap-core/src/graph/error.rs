//! Graph error types.

use thiserror::Error;

/// Errors that can occur while building, merging or rendering relation graphs.
#[derive(Debug, Error)]
pub enum GraphError {
    /// Serialized graph text could not be parsed.
    #[error("Failed to parse graph: {0}")]
    Decode(String),

    /// Graph could not be written as text.
    #[error("Failed to serialize graph: {0}")]
    Encode(String),

    /// A namespace or generated URI is not a valid IRI.
    #[error("Invalid IRI: {0}")]
    InvalidIri(String),

    /// Unclassified mappings never become triples.
    #[error("Relation from '{0}' has no ontology class")]
    UnclassifiedTarget(String),
}

//! Crate-level error taxonomy surfaced to callers.

use std::path::PathBuf;
use thiserror::Error;

use crate::graph::GraphError;
use crate::mapping::MappingError;
use crate::registry::RegistryError;
use crate::tabular::TableError;

/// Errors returned by [`crate::OntologyService`] operations.
///
/// Every variant is local to one request; the registry is never left
/// half-written.
#[derive(Debug, Error)]
pub enum OntomapError {
    /// Bad request input: empty class list, empty table, unknown target value.
    #[error("Invalid input: {0}")]
    Input(String),

    /// No strategy placed the item and a definitive relation was required.
    #[error("Dataset '{0}' could not be mapped to any ontology class")]
    Unclassified(String),

    /// Malformed upload or stored graph text.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Unknown ontology id.
    #[error("Ontology not found: {0}")]
    NotFound(String),

    /// Upload exceeds the configured size limit.
    #[error("File is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },

    /// Embedding model failure.
    #[error(transparent)]
    Mapping(MappingError),

    /// Graph could not be built or written.
    #[error("Graph error: {0}")]
    Graph(String),

    /// IO error.
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A blocking worker task panicked or was cancelled.
    #[error("Worker task failed: {0}")]
    Worker(String),
}

impl OntomapError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OntomapError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<MappingError> for OntomapError {
    fn from(err: MappingError) -> Self {
        match err {
            MappingError::EmptyClasses | MappingError::UnknownModel(_) => {
                OntomapError::Input(err.to_string())
            }
            other => OntomapError::Mapping(other),
        }
    }
}

impl From<TableError> for OntomapError {
    fn from(err: TableError) -> Self {
        match err {
            TableError::Unsupported(_) | TableError::Empty => OntomapError::Input(err.to_string()),
            other => OntomapError::Decode(other.to_string()),
        }
    }
}

impl From<GraphError> for OntomapError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Decode(_) => OntomapError::Decode(err.to_string()),
            GraphError::UnclassifiedTarget(source) => OntomapError::Unclassified(source),
            other => OntomapError::Graph(other.to_string()),
        }
    }
}

impl From<RegistryError> for OntomapError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) => OntomapError::NotFound(id),
            RegistryError::Graph(graph) => graph.into(),
        }
    }
}

impl From<tokio::task::JoinError> for OntomapError {
    fn from(err: tokio::task::JoinError) -> Self {
        OntomapError::Worker(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(matches!(
            OntomapError::from(MappingError::EmptyClasses),
            OntomapError::Input(_)
        ));
        assert!(matches!(
            OntomapError::from(MappingError::Embedding("onnx".to_string())),
            OntomapError::Mapping(_)
        ));
        assert!(matches!(
            OntomapError::from(TableError::Empty),
            OntomapError::Input(_)
        ));
        assert!(matches!(
            OntomapError::from(TableError::Encoding),
            OntomapError::Decode(_)
        ));
        assert!(matches!(
            OntomapError::from(RegistryError::NotFound("x".to_string())),
            OntomapError::NotFound(id) if id == "x"
        ));
        assert!(matches!(
            OntomapError::from(RegistryError::Graph(GraphError::Decode("bad".to_string()))),
            OntomapError::Decode(_)
        ));
    }
}

use thiserror::Error;

use crate::graph::GraphError;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Ontology not found: {0}")]
    NotFound(String),

    #[error("Stored graph could not be merged: {0}")]
    Graph(#[from] GraphError),
}

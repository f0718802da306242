//! Hybrid ontology mapping of datasets.
//!
//! Dataset names are classified against caller-supplied ontology classes by a
//! keyword → embedding → unclassified chain, recorded as RDF relations and
//! kept in an in-memory registry.

pub mod builder;
pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod mapping;
pub mod registry;
pub mod service;
pub mod tabular;

pub use config::Config;
pub use error::OntomapError;
pub use graph::{DisplayGraph, OntologyGraph, Relation};
pub use mapping::{HybridMapper, MappingMethod, MappingResult};
pub use registry::{OntologyRecord, OntologyRegistry};
pub use service::{BuildOutcome, OntologyService, UploadOutcome, UploadRequest};

//! API request/response types for the HTTP server.
//!
//! Field names follow the web frontend (`mapping_df`, `g`, PascalCase row
//! keys), so core types are converted here and nowhere else.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use ontomap_core::graph::{DisplayEdge, DisplayGraph, DisplayNode};
use ontomap_core::registry::{OntologyRecord, OntologySummary};
use ontomap_core::{BuildOutcome, MappingResult, Relation, UploadOutcome};

// =============================================================================
// Row Models
// =============================================================================

/// One relation row, as returned by uploads and lookups.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RelationRow {
    pub source: String,
    pub target: String,
    pub relation: String,
    pub method: String,
    pub confidence: f64,
}

impl From<&Relation> for RelationRow {
    fn from(relation: &Relation) -> Self {
        Self {
            source: relation.source.clone(),
            target: relation.target.clone(),
            relation: relation.relation_type.clone(),
            method: relation.method.to_string(),
            confidence: relation.confidence,
        }
    }
}

/// One mapping decision row, as returned by builds and `/api/v1/map`.
#[derive(Debug, Serialize)]
pub struct MappingRow {
    #[serde(rename = "Filename")]
    pub filename: String,
    #[serde(rename = "Interpreted_As")]
    pub interpreted_as: String,
    #[serde(rename = "Mapped_Class")]
    pub mapped_class: String,
    #[serde(rename = "Confidence")]
    pub confidence: f64,
    #[serde(rename = "Method")]
    pub method: String,
}

impl From<&MappingResult> for MappingRow {
    fn from(result: &MappingResult) -> Self {
        Self {
            filename: result.source_text.clone(),
            interpreted_as: result.interpreted_as.clone(),
            mapped_class: result.mapped_class.clone(),
            confidence: result.confidence,
            method: result.method.to_string(),
        }
    }
}

// =============================================================================
// Upload (`/api/v1/upload_data`)
// =============================================================================

#[derive(Debug, Serialize)]
pub struct UploadDataResponse {
    pub message: String,
    pub ontology_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub records_processed: usize,
    pub relations_added: usize,
    pub mapping_df: Vec<RelationRow>,
    /// Turtle text.
    pub g: String,
}

impl From<UploadOutcome> for UploadDataResponse {
    fn from(outcome: UploadOutcome) -> Self {
        Self {
            mapping_df: outcome.mapping_rows.iter().map(RelationRow::from).collect(),
            message: outcome.message,
            ontology_id: outcome.ontology_id,
            file_name: outcome.file_name,
            file_size: outcome.file_size,
            records_processed: outcome.records_processed,
            relations_added: outcome.relations_added,
            g: outcome.graph,
        }
    }
}

// =============================================================================
// Build and Map
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct BuildRequest {
    pub ontology_classes: Vec<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BuildResponse {
    pub message: String,
    pub ontology_id: Option<String>,
    pub mapping_df: Vec<MappingRow>,
    pub method_counts: BTreeMap<String, usize>,
    pub skipped: usize,
    pub g: String,
}

impl From<BuildOutcome> for BuildResponse {
    fn from(outcome: BuildOutcome) -> Self {
        let report = outcome.report;
        Self {
            message: outcome.message,
            ontology_id: outcome.ontology_id,
            mapping_df: report.mappings.iter().map(MappingRow::from).collect(),
            method_counts: report
                .method_counts
                .iter()
                .map(|(method, count)| (method.to_string(), *count))
                .collect(),
            skipped: report.skipped,
            g: report.graph,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MapRequest {
    pub texts: Vec<String>,
    pub ontology_classes: Vec<String>,
    #[serde(default)]
    pub model_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MapResponse {
    pub message: String,
    pub mapping_df: Vec<MappingRow>,
}

// =============================================================================
// Lookup Models
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OntologyQuery {
    pub ontology_id: String,
}

#[derive(Debug, Serialize)]
pub struct GetOntologyResponse {
    pub message: String,
    pub ontology_id: String,
    pub created_at: String,
    pub ontology_classes: Vec<String>,
    pub mapping_count: usize,
    pub mapping_df: Vec<RelationRow>,
    pub g: String,
}

impl From<OntologyRecord> for GetOntologyResponse {
    fn from(record: OntologyRecord) -> Self {
        Self {
            message: "Ontology retrieved".to_string(),
            mapping_df: record.mapping_rows.iter().map(RelationRow::from).collect(),
            ontology_id: record.id,
            created_at: record.created_at.to_rfc3339(),
            ontology_classes: record.ontology_classes,
            mapping_count: record.mapping_count,
            g: record.graph,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OntologyListItem {
    pub ontology_id: String,
    pub created_at: String,
    pub ontology_classes: Vec<String>,
    pub mapping_count: usize,
}

impl From<OntologySummary> for OntologyListItem {
    fn from(summary: OntologySummary) -> Self {
        Self {
            ontology_id: summary.id,
            created_at: summary.created_at.to_rfc3339(),
            ontology_classes: summary.ontology_classes,
            mapping_count: summary.mapping_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListOntologiesResponse {
    pub message: String,
    pub total: usize,
    pub ontologies: Vec<OntologyListItem>,
}

// =============================================================================
// Graph View (`/api/v1/get_ontology_graph`)
// =============================================================================

#[derive(Debug, Serialize)]
pub struct OntologyGraphResponse {
    pub message: String,
    pub ontology_id: String,
    pub nodes: Vec<DisplayNode>,
    pub edges: Vec<DisplayEdge>,
}

impl OntologyGraphResponse {
    pub fn new(ontology_id: impl Into<String>, graph: DisplayGraph) -> Self {
        Self {
            message: "Graph retrieved".to_string(),
            ontology_id: ontology_id.into(),
            nodes: graph.nodes,
            edges: graph.edges,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

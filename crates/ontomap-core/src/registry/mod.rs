//! In-memory store of built ontologies, keyed by id.
//!
//! Records live for the lifetime of the process. Mutation of one id never
//! blocks or corrupts another.

mod error;

pub use error::RegistryError;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::graph::{OntologyGraph, Relation};

/// A stored ontology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ontology_classes: Vec<String>,
    /// Always `mapping_rows.len()`.
    pub mapping_count: usize,
    /// Canonical Turtle text.
    pub graph: String,
    pub mapping_rows: Vec<Relation>,
}

impl OntologyRecord {
    pub fn to_summary(&self) -> OntologySummary {
        OntologySummary {
            id: self.id.clone(),
            created_at: self.created_at,
            ontology_classes: self.ontology_classes.clone(),
            mapping_count: self.mapping_count,
        }
    }
}

/// A lightweight summary of an ontology for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologySummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub ontology_classes: Vec<String>,
    pub mapping_count: usize,
}

/// Concurrent keyed store of [`OntologyRecord`]s.
#[derive(Debug, Default)]
pub struct OntologyRegistry {
    records: DashMap<String, OntologyRecord>,
}

impl OntologyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the record for `id`.
    pub fn save(
        &self,
        id: &str,
        ontology_classes: Vec<String>,
        graph: String,
        mapping_rows: Vec<Relation>,
    ) -> OntologyRecord {
        let now = Utc::now();
        let record = OntologyRecord {
            id: id.to_string(),
            created_at: now,
            updated_at: now,
            ontology_classes,
            mapping_count: mapping_rows.len(),
            graph,
            mapping_rows,
        };
        self.records.insert(id.to_string(), record.clone());
        tracing::info!(id, mapping_count = record.mapping_count, "ontology saved");
        record
    }

    /// Replace the graph of an existing record and append `new_rows`.
    pub fn update(
        &self,
        id: &str,
        graph: String,
        new_rows: Vec<Relation>,
    ) -> Result<OntologyRecord, RegistryError> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        record.graph = graph;
        record.mapping_rows.extend(new_rows);
        record.mapping_count = record.mapping_rows.len();
        record.updated_at = Utc::now();

        tracing::info!(id, mapping_count = record.mapping_count, "ontology updated");
        Ok(record.clone())
    }

    /// Merge `relations` into the stored graph of `id` and append them as rows.
    ///
    /// Parse, merge and write happen under the record's lock, so concurrent
    /// merges into one id are all kept. A malformed stored graph leaves the
    /// record untouched.
    pub fn merge_update(
        &self,
        id: &str,
        relations: &[Relation],
        namespaces: &GraphConfig,
    ) -> Result<OntologyRecord, RegistryError> {
        let mut record = self
            .records
            .get_mut(id)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))?;

        let merged = OntologyGraph::merge_into(&record.graph, relations, namespaces)?.serialize()?;

        record.graph = merged;
        record.mapping_rows.extend_from_slice(relations);
        record.mapping_count = record.mapping_rows.len();
        record.updated_at = Utc::now();

        tracing::info!(id, mapping_count = record.mapping_count, "ontology merged");
        Ok(record.clone())
    }

    pub fn get(&self, id: &str) -> Result<OntologyRecord, RegistryError> {
        self.records
            .get(id)
            .map(|r| r.clone())
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    /// All records, newest first.
    pub fn list_all(&self) -> Vec<OntologyRecord> {
        let mut records: Vec<OntologyRecord> =
            self.records.iter().map(|r| r.value().clone()).collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    pub fn delete(&self, id: &str) -> Result<OntologyRecord, RegistryError> {
        self.records
            .remove(id)
            .map(|(_, record)| record)
            .ok_or_else(|| RegistryError::NotFound(id.to_string()))
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }
}

//! Bulk mode: map every CSV file in a folder by name.
//!
//! Unlike uploads, unclassified files are skipped and counted instead of
//! failing the whole build.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use serde::Serialize;

use crate::config::{BuilderConfig, GraphConfig};
use crate::error::OntomapError;
use crate::graph::{OntologyGraph, Relation};
use crate::mapping::{HybridMapper, MappingMethod, MappingResult};

/// Outcome of a folder build.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    /// One result per file, unclassified ones included.
    pub mappings: Vec<MappingResult>,
    /// Relations that made it into the graph.
    pub relations: Vec<Relation>,
    pub method_counts: BTreeMap<MappingMethod, usize>,
    /// Files left out because no class was found.
    pub skipped: usize,
    /// Turtle text of the built graph.
    pub graph: String,
    /// Where the graph was written, if anything was processed.
    pub export_path: Option<PathBuf>,
}

pub struct FolderBuilder<'a> {
    mapper: &'a HybridMapper,
    config: &'a BuilderConfig,
    namespaces: &'a GraphConfig,
    relation_type: &'a str,
}

impl<'a> FolderBuilder<'a> {
    pub fn new(
        mapper: &'a HybridMapper,
        config: &'a BuilderConfig,
        namespaces: &'a GraphConfig,
        relation_type: &'a str,
    ) -> Self {
        Self {
            mapper,
            config,
            namespaces,
            relation_type,
        }
    }

    pub fn build(&self) -> Result<BuildReport, OntomapError> {
        let input_dir = &self.config.input_dir;
        let mut graph = OntologyGraph::new(self.namespaces.clone());

        if !input_dir.exists() {
            fs::create_dir_all(input_dir).map_err(|e| OntomapError::io(input_dir, e))?;
            tracing::info!(path = %input_dir.display(), "created input folder");
            return Ok(BuildReport {
                graph: graph.serialize()?,
                ..Default::default()
            });
        }

        let files = csv_files(input_dir);
        if files.is_empty() {
            tracing::warn!(path = %input_dir.display(), "no CSV files in input folder");
            return Ok(BuildReport {
                graph: graph.serialize()?,
                ..Default::default()
            });
        }

        let mappings = self.mapper.map_many(&files)?;

        let mut relations = Vec::new();
        let mut method_counts = BTreeMap::new();
        let mut skipped = 0;

        for mapping in &mappings {
            *method_counts.entry(mapping.method).or_insert(0) += 1;

            let stem = Path::new(&mapping.source_text)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| mapping.source_text.clone());

            match Relation::from_mapping(stem, mapping, self.relation_type) {
                Some(relation) => {
                    graph.add_relation(&relation)?;
                    tracing::info!(
                        file = %mapping.source_text,
                        class = %relation.target,
                        method = %relation.method,
                        confidence = relation.confidence,
                        "file mapped"
                    );
                    relations.push(relation);
                }
                None => {
                    tracing::warn!(file = %mapping.source_text, "file skipped, needs manual review");
                    skipped += 1;
                }
            }
        }

        let text = graph.serialize()?;
        let export_path = self.export(&text)?;

        tracing::info!(
            files = mappings.len(),
            relations = relations.len(),
            skipped,
            "folder build complete"
        );

        Ok(BuildReport {
            mappings,
            relations,
            method_counts,
            skipped,
            graph: text,
            export_path: Some(export_path),
        })
    }

    fn export(&self, text: &str) -> Result<PathBuf, OntomapError> {
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|e| OntomapError::io(output_dir, e))?;

        let path = self.config.output_path();
        fs::write(&path, text).map_err(|e| OntomapError::io(&path, e))?;
        tracing::info!(path = %path.display(), "graph exported");
        Ok(path)
    }
}

/// CSV file names directly inside `dir`, sorted.
fn csv_files(dir: &Path) -> Vec<String> {
    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .standard_filters(false)
        .hidden(true)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();

    walker
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .filter(|name| name.ends_with(".csv") || name.ends_with(".CSV"))
        .collect()
}

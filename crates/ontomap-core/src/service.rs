//! Request-level orchestration: mapping, graph building and registry writes.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::builder::{BuildReport, FolderBuilder};
use crate::config::Config;
use crate::error::OntomapError;
use crate::extract::RelationExtractor;
use crate::graph::{to_nodes_and_edges, DisplayGraph, OntologyGraph, Relation};
use crate::mapping::{EmbedderCache, HybridMapper, MappingResult};
use crate::registry::{OntologyRecord, OntologyRegistry, OntologySummary};
use crate::tabular::{FileKind, Table};

/// An uploaded file plus the options that steer its mapping.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub ontology_classes: Vec<String>,
    /// Merge into this ontology instead of creating a new one.
    pub ontology_id: Option<String>,
    pub relation_type: Option<String>,
    pub target_column: Option<String>,
    pub model_name: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadOutcome {
    pub message: String,
    pub ontology_id: String,
    pub file_name: String,
    pub file_size: u64,
    pub records_processed: usize,
    pub relations_added: usize,
    pub mapping_rows: Vec<Relation>,
    /// Turtle text of the new or merged graph.
    pub graph: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub message: String,
    /// Set when at least one relation was stored.
    pub ontology_id: Option<String>,
    pub report: BuildReport,
}

/// Shared entry point for the HTTP handlers and the CLI.
///
/// Construct once per process and share behind an `Arc`.
pub struct OntologyService {
    config: Config,
    registry: Arc<OntologyRegistry>,
    embedders: EmbedderCache,
}

impl OntologyService {
    /// Service that loads fastembed models on demand.
    pub fn new(config: Config) -> Self {
        let embedders = EmbedderCache::new(config.mapping.cache_dir_or_default());
        Self::with_embedders(config, embedders)
    }

    pub fn with_embedders(config: Config, embedders: EmbedderCache) -> Self {
        Self {
            config,
            registry: Arc::new(OntologyRegistry::new()),
            embedders,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &Arc<OntologyRegistry> {
        &self.registry
    }

    /// Classify names without touching the registry.
    pub async fn map_texts(
        &self,
        texts: Vec<String>,
        classes: Vec<String>,
        model_name: Option<&str>,
    ) -> Result<Vec<MappingResult>, OntomapError> {
        let mapper = self.mapper(classes, model_name).await?;
        let results = tokio::task::spawn_blocking(move || mapper.map_many(&texts)).await??;
        Ok(results)
    }

    /// Decode an upload, map it to one relation and store it.
    ///
    /// The registry is written only after the relation and graph exist.
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadOutcome, OntomapError> {
        let UploadRequest {
            file_name,
            bytes,
            ontology_classes,
            ontology_id,
            relation_type,
            target_column,
            model_name,
        } = request;

        let file_size = bytes.len() as u64;
        let limit = self.config.server.max_upload_size;
        if file_size > limit {
            return Err(OntomapError::TooLarge {
                size: file_size,
                limit,
            });
        }
        if file_name.trim().is_empty() {
            return Err(OntomapError::Input("file name is required".to_string()));
        }

        let kind = FileKind::from_file_name(&file_name)?;
        let classes = clean_classes(ontology_classes)?;
        let relation_type = non_empty(relation_type)
            .unwrap_or_else(|| self.config.mapping.relation_type.clone());
        let target_column = non_empty(target_column);
        let ontology_id = non_empty(ontology_id);

        tracing::info!(file_name = %file_name, file_size, ?kind, "processing upload");

        let mapper = self.mapper(classes.clone(), non_empty(model_name).as_deref()).await?;
        let name = file_name.clone();
        let (records_processed, relation) = tokio::task::spawn_blocking(move || {
            let table = Table::decode(&bytes, kind)?;
            let relation = RelationExtractor::new(&mapper).extract(
                &table,
                &name,
                &relation_type,
                target_column.as_deref(),
            )?;
            Ok::<_, OntomapError>((table.row_count(), relation))
        })
        .await??;

        let namespaces = &self.config.graph;
        let (ontology_id, graph) = match ontology_id {
            Some(id) => {
                let record = self
                    .registry
                    .merge_update(&id, std::slice::from_ref(&relation), namespaces)?;
                (id, record.graph)
            }
            None => {
                let id = Uuid::new_v4().to_string();
                let graph =
                    OntologyGraph::build_new(std::slice::from_ref(&relation), namespaces)?
                        .serialize()?;
                self.registry
                    .save(&id, classes, graph.clone(), vec![relation.clone()]);
                (id, graph)
            }
        };

        Ok(UploadOutcome {
            message: "Data uploaded and ontology built".to_string(),
            ontology_id,
            file_name,
            file_size,
            records_processed,
            relations_added: 1,
            mapping_rows: vec![relation],
            graph,
        })
    }

    /// Map every CSV in the configured input folder and store the result.
    pub async fn build_from_folder(
        &self,
        classes: Vec<String>,
        model_name: Option<&str>,
    ) -> Result<BuildOutcome, OntomapError> {
        let classes = clean_classes(classes)?;
        let mapper = self.mapper(classes.clone(), model_name).await?;

        let builder_config = self.config.builder.clone();
        let namespaces = self.config.graph.clone();
        let relation_type = self.config.mapping.relation_type.clone();
        let report = tokio::task::spawn_blocking(move || {
            FolderBuilder::new(&mapper, &builder_config, &namespaces, &relation_type).build()
        })
        .await??;

        let ontology_id = if report.relations.is_empty() {
            None
        } else {
            let id = Uuid::new_v4().to_string();
            self.registry
                .save(&id, classes, report.graph.clone(), report.relations.clone());
            Some(id)
        };

        Ok(BuildOutcome {
            message: "Ontology build complete".to_string(),
            ontology_id,
            report,
        })
    }

    pub fn get(&self, id: &str) -> Result<OntologyRecord, OntomapError> {
        Ok(self.registry.get(id)?)
    }

    /// Summaries, newest first.
    pub fn list(&self) -> Vec<OntologySummary> {
        self.registry
            .list_all()
            .iter()
            .map(OntologyRecord::to_summary)
            .collect()
    }

    pub fn delete(&self, id: &str) -> Result<(), OntomapError> {
        self.registry.delete(id)?;
        tracing::info!(id, "ontology deleted");
        Ok(())
    }

    pub fn graph_view(&self, id: &str) -> Result<DisplayGraph, OntomapError> {
        let record = self.registry.get(id)?;
        Ok(to_nodes_and_edges(&record.graph)?)
    }

    /// All stored graphs in one view. A record whose graph text does not
    /// parse is logged and left out.
    pub fn merged_graph_view(&self) -> DisplayGraph {
        let mut display = DisplayGraph::default();
        for record in self.registry.list_all() {
            if let Err(err) = display.absorb(&record.graph) {
                tracing::warn!(id = %record.id, error = %err, "skipping unreadable graph");
            }
        }
        display
    }

    async fn mapper(
        &self,
        classes: Vec<String>,
        model_name: Option<&str>,
    ) -> Result<HybridMapper, OntomapError> {
        let model = model_name.unwrap_or(&self.config.mapping.model_name);
        let embedder = self.embedders.get(model).await?;
        Ok(HybridMapper::from_config(
            classes,
            embedder,
            &self.config.mapping,
        )?)
    }
}

fn clean_classes(classes: Vec<String>) -> Result<Vec<String>, OntomapError> {
    let classes: Vec<String> = classes
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if classes.is_empty() {
        return Err(OntomapError::Input(
            "at least one ontology class is required".to_string(),
        ));
    }
    Ok(classes)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

//! Turning one uploaded table into exactly one dataset → class relation.

use crate::error::OntomapError;
use crate::graph::Relation;
use crate::mapping::{HybridMapper, MappingMethod};
use crate::tabular::Table;

/// Extracts the relation for an uploaded file.
pub struct RelationExtractor<'a> {
    mapper: &'a HybridMapper,
}

impl<'a> RelationExtractor<'a> {
    pub fn new(mapper: &'a HybridMapper) -> Self {
        Self { mapper }
    }

    /// Relation from `file_name` to its ontology class.
    ///
    /// With a `target_column` present in the table, the first of its values
    /// that names a known class is used directly. Otherwise the file name is
    /// hybrid-mapped, and an unclassified result fails the call.
    pub fn extract(
        &self,
        table: &Table,
        file_name: &str,
        relation_type: &str,
        target_column: Option<&str>,
    ) -> Result<Relation, OntomapError> {
        if let Some(column) = target_column.filter(|c| table.has_column(c)) {
            return self.direct(table, file_name, relation_type, column);
        }

        let mapping = self.mapper.map_one(file_name)?;
        match Relation::from_mapping(file_name, &mapping, relation_type) {
            Some(relation) => {
                tracing::info!(
                    file_name,
                    class = %relation.target,
                    method = %relation.method,
                    confidence = relation.confidence,
                    "dataset mapped"
                );
                Ok(relation)
            }
            None => {
                tracing::warn!(file_name, "dataset could not be mapped");
                Err(OntomapError::Unclassified(file_name.to_string()))
            }
        }
    }

    fn direct(
        &self,
        table: &Table,
        file_name: &str,
        relation_type: &str,
        column: &str,
    ) -> Result<Relation, OntomapError> {
        let classes = self.mapper.classes();
        let target = table
            .unique_values(column)
            .into_iter()
            .map(str::trim)
            .find(|v| !v.is_empty() && classes.iter().any(|c| c == v))
            .ok_or_else(|| {
                OntomapError::Input(format!(
                    "no value in column '{column}' names a known ontology class"
                ))
            })?;

        tracing::info!(file_name, class = target, column, "direct mapping from target column");
        Ok(Relation {
            source: file_name.to_string(),
            target: target.to_string(),
            relation_type: relation_type.to_string(),
            method: MappingMethod::Direct,
            confidence: 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{Embedder, MappingError};
    use crate::tabular::FileKind;
    use std::sync::Arc;

    /// Every text is orthogonal to every class.
    struct OrthogonalEmbedder;

    impl Embedder for OrthogonalEmbedder {
        fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, MappingError> {
            Ok(texts
                .iter()
                .map(|t| if t.contains('_') { vec![1.0, 0.0] } else { vec![0.0, 1.0] })
                .collect())
        }

        fn dimension(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "orthogonal"
        }
    }

    fn mapper() -> HybridMapper {
        HybridMapper::new(
            vec!["Industrial_Pump".to_string(), "Welding_Robot".to_string()],
            Arc::new(OrthogonalEmbedder),
        )
        .unwrap()
    }

    fn table(csv: &str) -> Table {
        Table::decode(csv.as_bytes(), FileKind::Csv).unwrap()
    }

    #[test]
    fn test_direct_from_target_column() {
        let mapper = mapper();
        let extractor = RelationExtractor::new(&mapper);
        let t = table("equipment,value\n  ,1\nunknown,2\n Welding_Robot ,3\n");

        let relation = extractor
            .extract(&t, "readings.csv", "isDataOf", Some("equipment"))
            .unwrap();
        assert_eq!(relation.target, "Welding_Robot");
        assert_eq!(relation.method, MappingMethod::Direct);
        assert_eq!(relation.confidence, 1.0);
        assert_eq!(relation.source, "readings.csv");
    }

    #[test]
    fn test_target_column_without_known_class() {
        let mapper = mapper();
        let extractor = RelationExtractor::new(&mapper);
        let t = table("equipment\nLathe\n");

        let result = extractor.extract(&t, "pump_01.csv", "isDataOf", Some("equipment"));
        assert!(matches!(result, Err(OntomapError::Input(_))));
    }

    #[test]
    fn test_missing_target_column_falls_back_to_file_name() {
        let mapper = mapper();
        let extractor = RelationExtractor::new(&mapper);
        let t = table("a\n1\n");

        let relation = extractor
            .extract(&t, "pump_01.csv", "hasData", Some("equipment"))
            .unwrap();
        assert_eq!(relation.target, "Industrial_Pump");
        assert_eq!(relation.method, MappingMethod::Rule);
        assert_eq!(relation.relation_type, "hasData");
    }

    #[test]
    fn test_unclassified_file_name_fails() {
        let mapper = mapper();
        let extractor = RelationExtractor::new(&mapper);
        let t = table("a\n1\n");

        let result = extractor.extract(&t, "xyz_unrelated_42.csv", "isDataOf", None);
        assert!(matches!(result, Err(OntomapError::Unclassified(name)) if name == "xyz_unrelated_42.csv"));
    }
}

//! Relation graph: dataset → predicate → class triples.
//!
//! Graphs are stored and exchanged as Turtle text with two bound prefixes,
//! `meta` for schema terms and `fact` for instance URIs. Subjects, predicates
//! and objects are minted in the `fact` namespace from percent-encoded strings,
//! so the same string always yields the same node.

mod display;
mod error;

pub use display::{
    merge_graphs_for_display, to_nodes_and_edges, DisplayEdge, DisplayGraph, DisplayNode, NodeType,
};
pub use error::GraphError;

use std::collections::BTreeSet;

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{Graph, NamedNode, Term, TermRef, Triple};
use serde::{Deserialize, Serialize};

use crate::config::GraphConfig;
use crate::mapping::{MappingMethod, MappingResult, UNCLASSIFIED};

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

/// One extracted dataset → class link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Dataset identifier (file name or stem).
    pub source: String,
    /// Ontology class.
    pub target: String,
    /// Predicate local name, e.g. `isDataOf`.
    pub relation_type: String,
    /// How the target was chosen.
    pub method: MappingMethod,
    /// Confidence of the mapping decision.
    pub confidence: f64,
}

impl Relation {
    /// Relation for a classified mapping, or `None` when it is unclassified.
    pub fn from_mapping(
        source: impl Into<String>,
        mapping: &MappingResult,
        relation_type: &str,
    ) -> Option<Self> {
        if !mapping.is_classified() {
            return None;
        }
        Some(Self {
            source: source.into(),
            target: mapping.mapped_class.clone(),
            relation_type: relation_type.to_string(),
            method: mapping.method,
            confidence: mapping.confidence,
        })
    }
}

/// An in-memory triple set bound to a pair of namespaces.
#[derive(Debug, Clone)]
pub struct OntologyGraph {
    graph: Graph,
    namespaces: GraphConfig,
}

impl OntologyGraph {
    /// Empty graph.
    pub fn new(namespaces: GraphConfig) -> Self {
        Self {
            graph: Graph::new(),
            namespaces,
        }
    }

    /// Fresh graph holding one triple per relation.
    pub fn build_new(relations: &[Relation], namespaces: &GraphConfig) -> GraphResult<Self> {
        let mut graph = Self::new(namespaces.clone());
        for relation in relations {
            graph.add_relation(relation)?;
        }
        Ok(graph)
    }

    /// Parse Turtle text.
    pub fn parse(text: &str, namespaces: &GraphConfig) -> GraphResult<Self> {
        let mut graph = Self::new(namespaces.clone());
        for triple in parse_triples(text)? {
            graph.graph.insert(&triple);
        }
        Ok(graph)
    }

    /// Parse `existing` and union `relations` into it.
    ///
    /// Malformed text fails the whole call.
    pub fn merge_into(
        existing: &str,
        relations: &[Relation],
        namespaces: &GraphConfig,
    ) -> GraphResult<Self> {
        let mut graph = Self::parse(existing, namespaces)?;
        let before = graph.len();
        for relation in relations {
            graph.add_relation(relation)?;
        }
        tracing::debug!(before, after = graph.len(), "merged relations into graph");
        Ok(graph)
    }

    /// Add the triple for `relation`. Returns false when it was already present.
    pub fn add_relation(&mut self, relation: &Relation) -> GraphResult<bool> {
        if relation.target == UNCLASSIFIED || relation.method == MappingMethod::Unclassified {
            return Err(GraphError::UnclassifiedTarget(relation.source.clone()));
        }

        let triple = Triple::new(
            self.fact_node(&relation.source)?,
            self.fact_node(&relation.relation_type)?,
            self.fact_node(&relation.target)?,
        );
        Ok(self.graph.insert(&triple))
    }

    /// Turtle text with `meta` and `fact` prefixes, triples in sorted order.
    pub fn serialize(&self) -> GraphResult<String> {
        let mut triples: Vec<Triple> = self.graph.iter().map(|t| t.into_owned()).collect();
        triples.sort_by_cached_key(|t| t.to_string());

        let mut serializer = RdfSerializer::from_format(RdfFormat::Turtle)
            .with_prefix("meta", self.namespaces.meta_uri.as_str())
            .map_err(|e| GraphError::InvalidIri(e.to_string()))?
            .with_prefix("fact", self.namespaces.fact_uri.as_str())
            .map_err(|e| GraphError::InvalidIri(e.to_string()))?
            .for_writer(Vec::new());

        for triple in &triples {
            serializer
                .serialize_triple(triple)
                .map_err(|e| GraphError::Encode(e.to_string()))?;
        }

        let bytes = serializer
            .finish()
            .map_err(|e| GraphError::Encode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| GraphError::Encode(e.to_string()))
    }

    /// Triples as `(subject, predicate, object)` IRI strings, for comparisons.
    pub fn triple_set(&self) -> BTreeSet<(String, String, String)> {
        self.graph
            .iter()
            .map(|t| {
                (
                    term_string(TermRef::from(t.subject)),
                    t.predicate.as_str().to_string(),
                    term_string(t.object),
                )
            })
            .collect()
    }

    /// Number of triples.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    /// Whether the graph has no triples.
    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Namespaces this graph mints URIs in.
    pub fn namespaces(&self) -> &GraphConfig {
        &self.namespaces
    }

    fn fact_node(&self, local: &str) -> GraphResult<NamedNode> {
        let iri = format!("{}{}", self.namespaces.fact_uri, percent_encode(local));
        NamedNode::new(iri.as_str()).map_err(|e| GraphError::InvalidIri(format!("{iri}: {e}")))
    }
}

/// Parse Turtle text into owned triples, keeping document order.
pub(crate) fn parse_triples(text: &str) -> GraphResult<Vec<Triple>> {
    RdfParser::from_format(RdfFormat::Turtle)
        .for_slice(text.as_bytes())
        .map(|quad| {
            let quad = quad.map_err(|e| GraphError::Decode(e.to_string()))?;
            Ok(Triple::new(quad.subject, quad.predicate, quad.object))
        })
        .collect()
}

fn term_string(term: TermRef<'_>) -> String {
    match term {
        TermRef::NamedNode(node) => node.as_str().to_string(),
        other => Term::from(other).to_string(),
    }
}

/// Percent-encode `text` for use in a URI path.
///
/// Unreserved characters and `/` pass through; every other UTF-8 byte becomes
/// `%XX` with uppercase hex digits.
pub fn percent_encode(text: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";

    let mut out = String::with_capacity(text.len());
    for &byte in text.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'_' | b'.' | b'-' | b'~' | b'/' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0f) as usize] as char);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(source: &str, target: &str) -> Relation {
        Relation {
            source: source.to_string(),
            target: target.to_string(),
            relation_type: "isDataOf".to_string(),
            method: MappingMethod::Rule,
            confidence: 0.9,
        }
    }

    #[test]
    fn test_percent_encode() {
        assert_eq!(percent_encode("pump_01.csv"), "pump_01.csv");
        assert_eq!(percent_encode("line 3"), "line%203");
        assert_eq!(percent_encode("a/b#c"), "a/b%23c");
        assert_eq!(percent_encode("용접"), "%EC%9A%A9%EC%A0%91");
    }

    #[test]
    fn test_build_new_one_triple_per_relation() {
        let graph = OntologyGraph::build_new(
            &[relation("a.csv", "Motor"), relation("b.csv", "Motor")],
            &GraphConfig::default(),
        )
        .unwrap();
        assert_eq!(graph.len(), 2);

        let triples = graph.triple_set();
        assert!(triples.contains(&(
            "http://factory.org/a.csv".to_string(),
            "http://factory.org/isDataOf".to_string(),
            "http://factory.org/Motor".to_string(),
        )));
    }

    #[test]
    fn test_identical_relations_share_a_triple() {
        let mut graph = OntologyGraph::new(GraphConfig::default());
        assert!(graph.add_relation(&relation("a.csv", "Motor")).unwrap());
        assert!(!graph.add_relation(&relation("a.csv", "Motor")).unwrap());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_unclassified_target_rejected() {
        let mut graph = OntologyGraph::new(GraphConfig::default());
        let result = graph.add_relation(&relation("a.csv", UNCLASSIFIED));
        assert!(matches!(result, Err(GraphError::UnclassifiedTarget(_))));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_serialize_declares_prefixes() {
        let graph =
            OntologyGraph::build_new(&[relation("a.csv", "Motor")], &GraphConfig::default())
                .unwrap();
        let text = graph.serialize().unwrap();
        assert!(text.contains("fact:"));
        assert!(text.contains("<http://factory.org/>"));
    }

    #[test]
    fn test_merge_into_unions() {
        let ns = GraphConfig::default();
        let first = OntologyGraph::build_new(&[relation("a.csv", "Motor")], &ns)
            .unwrap()
            .serialize()
            .unwrap();

        let merged = OntologyGraph::merge_into(
            &first,
            &[relation("a.csv", "Motor"), relation("b.csv", "CNC_Machine")],
            &ns,
        )
        .unwrap();
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_into_malformed_text() {
        let result = OntologyGraph::merge_into(
            "this is <not turtle",
            &[relation("a.csv", "Motor")],
            &GraphConfig::default(),
        );
        assert!(matches!(result, Err(GraphError::Decode(_))));
    }

    #[test]
    fn test_invalid_namespace() {
        let ns = GraphConfig {
            meta_uri: "http://factory.org/meta/".to_string(),
            fact_uri: "not an iri".to_string(),
        };
        let result = OntologyGraph::build_new(&[relation("a.csv", "Motor")], &ns);
        assert!(matches!(result, Err(GraphError::InvalidIri(_))));
    }

    #[test]
    fn test_relation_from_mapping() {
        let mapping = MappingResult {
            source_text: "pump.csv".to_string(),
            mapped_class: "Industrial_Pump".to_string(),
            confidence: 0.8,
            method: MappingMethod::Rule,
            interpreted_as: "pump".to_string(),
        };
        let relation = Relation::from_mapping("pump", &mapping, "isDataOf").unwrap();
        assert_eq!(relation.source, "pump");
        assert_eq!(relation.target, "Industrial_Pump");

        let unclassified = MappingResult {
            mapped_class: UNCLASSIFIED.to_string(),
            method: MappingMethod::Unclassified,
            confidence: 0.0,
            ..mapping
        };
        assert!(Relation::from_mapping("pump", &unclassified, "isDataOf").is_none());
    }
}

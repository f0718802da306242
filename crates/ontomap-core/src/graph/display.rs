//! Node/edge projection of serialized graphs for visualization.

use std::collections::HashSet;

use oxigraph::model::{NamedNodeRef, TermRef};
use serde::{Deserialize, Serialize};

use super::{parse_triples, GraphResult};

/// Role of a node, decided by triple position alone.
///
/// Subjects are datasets and objects are classes whatever the predicate says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Dataset,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEdge {
    pub source: String,
    pub target: String,
    pub relation: String,
}

/// Nodes deduplicated by id, edges kept in full.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayGraph {
    pub nodes: Vec<DisplayNode>,
    pub edges: Vec<DisplayEdge>,
    #[serde(skip)]
    seen: HashSet<String>,
}

impl DisplayGraph {
    /// Append the nodes and edges of one serialized graph. Nothing is added
    /// when `text` fails to parse.
    pub(crate) fn absorb(&mut self, text: &str) -> GraphResult<()> {
        for triple in parse_triples(text)? {
            let subject = match TermRef::from(triple.subject.as_ref()) {
                TermRef::NamedNode(node) => node,
                _ => continue,
            };
            // Literal objects are attributes, not links.
            let object = match triple.object.as_ref() {
                TermRef::NamedNode(node) => node,
                _ => continue,
            };

            let source = self.node(subject, NodeType::Dataset);
            let target = self.node(object, NodeType::Class);
            self.edges.push(DisplayEdge {
                source,
                target,
                relation: local_name(triple.predicate.as_ref()).to_string(),
            });
        }
        Ok(())
    }

    /// Register a node if its id is new; returns the id.
    fn node(&mut self, iri: NamedNodeRef<'_>, node_type: NodeType) -> String {
        let id = local_name(iri).to_string();
        if self.seen.insert(id.clone()) {
            self.nodes.push(DisplayNode {
                id: id.clone(),
                label: id.clone(),
                node_type,
            });
        }
        id
    }
}

/// Project one serialized graph into nodes and edges.
pub fn to_nodes_and_edges(text: &str) -> GraphResult<DisplayGraph> {
    let mut display = DisplayGraph::default();
    display.absorb(text)?;
    Ok(display)
}

/// Union several serialized graphs. Node ids are shared across graphs;
/// edges are concatenated unfiltered.
pub fn merge_graphs_for_display<S: AsRef<str>>(texts: &[S]) -> GraphResult<DisplayGraph> {
    let mut display = DisplayGraph::default();
    for text in texts {
        display.absorb(text.as_ref())?;
    }
    Ok(display)
}

/// Text after the last `/` or `#`, left percent-encoded.
fn local_name(iri: NamedNodeRef<'_>) -> &str {
    let iri = iri.as_str();
    iri.rsplit(['/', '#']).next().unwrap_or(iri)
}

use crate::{EdgeRecord, NodeRecord};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// How to treat edges referencing nodes the input never declared
///
/// The lenient default mirrors the graph library behavior the upstream
/// constructor relies on: the endpoint is created with default attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndpointPolicy {
    /// Auto-create the missing endpoint with default attributes
    #[default]
    Lenient,

    /// Reject the document
    Strict,
}

/// An edge referenced a node missing from the input (strict mode only)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("edge {source_id} -> {target_id} references unknown node {missing}")]
pub struct UnknownEndpoint {
    pub source_id: String,
    pub target_id: String,
    pub missing: String,
}

/// In-memory music graph: an undirected petgraph carrying full node and
/// edge attributes, plus an index for lookups by track id
///
/// Self-loops and parallel edges in the input are kept as-is.
#[derive(Debug, Clone, Default)]
pub struct MusicGraph {
    graph: UnGraph<NodeRecord, EdgeRecord>,
    ids: HashMap<String, NodeIndex>,
}

impl MusicGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing the attributes of an existing node with
    /// the same id
    pub fn add_node(&mut self, record: NodeRecord) -> NodeIndex {
        match self.ids.get(&record.id) {
            Some(&index) => {
                self.graph[index] = record;
                index
            }
            None => {
                let id = record.id.clone();
                let index = self.graph.add_node(record);
                self.ids.insert(id, index);
                index
            }
        }
    }

    /// Insert an edge, resolving its endpoints according to the policy
    pub fn add_edge(
        &mut self,
        record: EdgeRecord,
        policy: EndpointPolicy,
    ) -> Result<(), UnknownEndpoint> {
        let source = self.resolve(&record.source, &record, policy)?;
        let target = self.resolve(&record.target, &record, policy)?;
        self.graph.add_edge(source, target, record);
        Ok(())
    }

    fn resolve(
        &mut self,
        id: &str,
        edge: &EdgeRecord,
        policy: EndpointPolicy,
    ) -> Result<NodeIndex, UnknownEndpoint> {
        if let Some(&index) = self.ids.get(id) {
            return Ok(index);
        }

        match policy {
            EndpointPolicy::Lenient => {
                warn!(node = id, "edge references an undeclared node, creating it with defaults");
                Ok(self.add_node(NodeRecord::with_defaults(id)))
            }
            EndpointPolicy::Strict => Err(UnknownEndpoint {
                source_id: edge.source.clone(),
                target_id: edge.target.clone(),
                missing: id.to_string(),
            }),
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Iterate over node records in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRecord> {
        self.graph.node_weights()
    }

    /// Look up a node record by track id
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.ids.get(id).map(|&index| &self.graph[index])
    }

    /// The track id stored at a node index
    pub fn id_of(&self, index: NodeIndex) -> &str {
        &self.graph[index].id
    }

    /// Weight of the edge between two nodes, 1.0 when they are not
    /// directly connected
    pub fn weight_between(&self, a: NodeIndex, b: NodeIndex) -> f64 {
        self.graph
            .find_edge(a, b)
            .map_or(1.0, |edge| self.graph[edge].weight)
    }

    /// The underlying petgraph structure
    pub fn petgraph(&self) -> &UnGraph<NodeRecord, EdgeRecord> {
        &self.graph
    }
}

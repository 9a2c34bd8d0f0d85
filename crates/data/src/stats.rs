use crate::{EdgeRecord, MusicGraph, NodeRecord};
use petgraph::graph::UnGraph;
use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while computing statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatsError {
    /// Averages over zero nodes are undefined
    #[error("cannot compute statistics for an empty graph")]
    EmptyGraph,
}

/// Min/max/mean summary of one numeric node attribute
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttributeRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

impl AttributeRange {
    /// Summarize a non-empty value list
    fn over(values: &[f64]) -> Self {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
        }
        Self {
            min,
            max,
            avg: sum / values.len() as f64,
        }
    }
}

impl fmt::Display for AttributeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "min {}, max {}, avg {:.2}",
            self.min, self.max, self.avg
        )
    }
}

/// Descriptive statistics over a music graph and its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub average_clustering: f64,
    pub connected_components: usize,
    pub largest_component_size: usize,
    pub average_degree: f64,
    pub popularity: AttributeRange,
    pub release_years: AttributeRange,
}

impl GraphStats {
    /// Compute statistics without mutating the graph
    ///
    /// # Errors
    /// Fails with [`StatsError::EmptyGraph`] when the graph has no nodes;
    /// the averages below would otherwise divide by zero.
    pub fn compute(music: &MusicGraph) -> Result<Self, StatsError> {
        let graph = music.petgraph();
        let nodes = graph.node_count();
        if nodes == 0 {
            return Err(StatsError::EmptyGraph);
        }

        let edges = graph.edge_count();
        let density = if nodes > 1 {
            2.0 * edges as f64 / (nodes as f64 * (nodes - 1) as f64)
        } else {
            0.0
        };

        let (connected_components, largest_component_size) = components(graph);

        let popularity: Vec<f64> = music.nodes().map(|record| record.popularity).collect();
        let release_years: Vec<f64> = music
            .nodes()
            .map(|record| f64::from(record.release_year))
            .collect();

        Ok(Self {
            nodes,
            edges,
            density,
            average_clustering: average_clustering(graph),
            connected_components,
            largest_component_size,
            average_degree: 2.0 * edges as f64 / nodes as f64,
            popularity: AttributeRange::over(&popularity),
            release_years: AttributeRange::over(&release_years),
        })
    }
}

impl fmt::Display for GraphStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "nodes: {}", self.nodes)?;
        writeln!(f, "edges: {}", self.edges)?;
        writeln!(f, "density: {:.6}", self.density)?;
        writeln!(f, "average clustering: {:.6}", self.average_clustering)?;
        writeln!(f, "connected components: {}", self.connected_components)?;
        writeln!(f, "largest component size: {}", self.largest_component_size)?;
        writeln!(f, "average degree: {:.6}", self.average_degree)?;
        writeln!(f, "popularity: {}", self.popularity)?;
        write!(f, "release years: {}", self.release_years)
    }
}

/// Number of connected components and the size of the largest one
fn components(graph: &UnGraph<NodeRecord, EdgeRecord>) -> (usize, usize) {
    let mut union = UnionFind::new(graph.node_count());
    for edge in graph.edge_references() {
        union.union(edge.source().index(), edge.target().index());
    }

    let mut sizes: HashMap<usize, usize> = HashMap::new();
    for index in 0..graph.node_count() {
        *sizes.entry(union.find(index)).or_insert(0) += 1;
    }

    let largest = sizes.values().copied().max().unwrap_or(0);
    (sizes.len(), largest)
}

/// Mean local clustering coefficient over all nodes
///
/// Nodes with fewer than two distinct neighbors contribute zero, as in
/// the usual definition.
fn average_clustering(graph: &UnGraph<NodeRecord, EdgeRecord>) -> f64 {
    let mut total = 0.0;

    for node in graph.node_indices() {
        let neighbors: HashSet<_> = graph.neighbors(node).filter(|&n| n != node).collect();
        if neighbors.len() < 2 {
            continue;
        }

        let list: Vec<_> = neighbors.into_iter().collect();
        let mut links = 0usize;
        for (i, &a) in list.iter().enumerate() {
            for &b in &list[i + 1..] {
                if graph.find_edge(a, b).is_some() {
                    links += 1;
                }
            }
        }

        let degree = list.len();
        total += 2.0 * links as f64 / (degree * (degree - 1)) as f64;
    }

    total / graph.node_count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EndpointPolicy;
    use test_log::test;

    fn graph_with(nodes: &[&str], edges: &[(&str, &str)]) -> MusicGraph {
        let mut graph = MusicGraph::new();
        for id in nodes {
            graph.add_node(NodeRecord::with_defaults(*id));
        }
        for (source, target) in edges {
            graph
                .add_edge(
                    EdgeRecord {
                        source: source.to_string(),
                        target: target.to_string(),
                        weight: 1.0,
                        thickness: 1.0,
                    },
                    EndpointPolicy::Strict,
                )
                .unwrap();
        }
        graph
    }

    #[test]
    fn empty_graph_is_an_error() {
        let graph = MusicGraph::new();
        assert_eq!(GraphStats::compute(&graph), Err(StatsError::EmptyGraph));
    }

    #[test]
    fn complete_graph_has_density_one() {
        let graph = graph_with(
            &["a", "b", "c", "d"],
            &[
                ("a", "b"),
                ("a", "c"),
                ("a", "d"),
                ("b", "c"),
                ("b", "d"),
                ("c", "d"),
            ],
        );
        let stats = GraphStats::compute(&graph).unwrap();

        assert_eq!(stats.density, 1.0);
        assert_eq!(stats.average_clustering, 1.0);
        assert_eq!(stats.connected_components, 1);
        assert_eq!(stats.largest_component_size, 4);
        assert_eq!(stats.average_degree, 3.0);
    }

    #[test]
    fn sparse_graph_density() {
        let graph = graph_with(&["a", "b", "c", "d"], &[("a", "b")]);
        let stats = GraphStats::compute(&graph).unwrap();

        assert_eq!(stats.density, 1.0 / 6.0);
        assert_eq!(stats.connected_components, 3);
        assert_eq!(stats.largest_component_size, 2);
    }

    #[test]
    fn single_node_graph() {
        let graph = graph_with(&["a"], &[]);
        let stats = GraphStats::compute(&graph).unwrap();

        assert_eq!(stats.density, 0.0);
        assert_eq!(stats.average_degree, 0.0);
        assert_eq!(stats.connected_components, 1);
        assert_eq!(stats.largest_component_size, 1);
    }

    #[test]
    fn triangle_with_tail_clustering() {
        // a-b-c form a triangle, d hangs off a
        let graph = graph_with(
            &["a", "b", "c", "d"],
            &[("a", "b"), ("b", "c"), ("c", "a"), ("a", "d")],
        );
        let stats = GraphStats::compute(&graph).unwrap();

        // b and c are fully clustered, a has one of three closed pairs,
        // d has a single neighbor
        let expected = (1.0 + 1.0 + 1.0 / 3.0) / 4.0;
        assert!((stats.average_clustering - expected).abs() < 1e-12);
    }

    #[test]
    fn attribute_ranges() {
        let mut graph = MusicGraph::new();
        for (id, popularity, year) in [("a", 10.0, 1990), ("b", 30.0, 2000), ("c", 80.0, 2020)] {
            let mut record = NodeRecord::with_defaults(id);
            record.popularity = popularity;
            record.release_year = year;
            graph.add_node(record);
        }

        let stats = GraphStats::compute(&graph).unwrap();
        assert_eq!(stats.popularity.min, 10.0);
        assert_eq!(stats.popularity.max, 80.0);
        assert_eq!(stats.popularity.avg, 40.0);
        assert_eq!(stats.release_years.min, 1990.0);
        assert_eq!(stats.release_years.max, 2020.0);
        assert!((stats.release_years.avg - 2003.3333333333333).abs() < 1e-9);
    }
}

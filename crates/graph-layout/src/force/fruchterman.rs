use super::{rescale, seed_circle, weighted_snapshot, Deadline, LayoutError};
use crate::{EdgeWeights, LayoutEngine, Point, Vec2};
use petgraph::visit::{IntoNeighbors, IntoNodeIdentifiers};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Distances below this are clamped before computing forces
const MIN_DISTANCE: f64 = 0.01;

/// Configuration for the Fruchterman-Reingold spring layout
///
/// Connected nodes attract, all pairs repel, and a linearly cooling
/// temperature caps per-iteration movement. This is the same algorithm
/// commonly exposed under the name "spring layout".
#[derive(Debug, Clone)]
pub struct FruchtermanReingold {
    /// Number of simulation iterations
    pub iterations: usize,

    /// Optimal distance between connected nodes
    pub k: f64,

    /// Half-extent of the final coordinate range
    pub scale: f64,

    /// Center of the final coordinate range
    pub center: Point,

    /// Optional wall-clock budget for the iteration loop
    pub timeout: Option<Duration>,
}

impl Default for FruchtermanReingold {
    fn default() -> Self {
        Self {
            iterations: 50,
            k: 1.0,
            scale: 1.0,
            center: Point::new(0.0, 0.0),
            timeout: None,
        }
    }
}

impl<G> LayoutEngine<G> for FruchtermanReingold
where
    G: IntoNodeIdentifiers + IntoNeighbors,
    G::NodeId: Copy + Ord + Hash,
{
    type NodeId = G::NodeId;
    type Error = LayoutError;

    fn layout<W>(&self, graph: G, weights: &W) -> Result<HashMap<Self::NodeId, Point>, LayoutError>
    where
        W: EdgeWeights<Self::NodeId>,
    {
        let snapshot = weighted_snapshot(graph, weights);
        let nodes: Vec<_> = snapshot.nodes().collect();

        // Iterating would divide by the node count; a lone node sits at
        // the center
        if nodes.len() <= 1 {
            return Ok(nodes.into_iter().map(|node| (node, self.center)).collect());
        }

        let index: HashMap<_, _> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let edges: Vec<(usize, usize, f64)> = snapshot
            .all_edges()
            .map(|(a, b, &weight)| (index[&a], index[&b], weight))
            .collect();

        let mut positions = seed_circle(nodes.len());
        let deadline = Deadline::new(self.timeout);

        // Start the temperature at a tenth of the initial extent and cool
        // linearly so late iterations only make small adjustments
        let mut temperature = 0.2;
        let cooling = temperature / (self.iterations + 1) as f64;

        for _ in 0..self.iterations {
            deadline.check()?;
            step(&mut positions, &edges, self.k, temperature);
            temperature -= cooling;
        }

        rescale(&mut positions, self.scale, self.center);

        Ok(nodes.into_iter().zip(positions).collect())
    }
}

/// Advance the simulation by one iteration
fn step(positions: &mut [Point], edges: &[(usize, usize, f64)], k: f64, temperature: f64) {
    let mut displacements = vec![Vec2::zero(); positions.len()];

    // Repulsion between every pair of nodes
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let dx = positions[i].x - positions[j].x;
            let dy = positions[i].y - positions[j].y;
            let distance = dx.hypot(dy).max(MIN_DISTANCE);
            let force = k * k / distance;
            displacements[i].x += dx / distance * force;
            displacements[i].y += dy / distance * force;
            displacements[j].x -= dx / distance * force;
            displacements[j].y -= dy / distance * force;
        }
    }

    // Attraction along edges, scaled by the edge weight
    for &(a, b, weight) in edges {
        let dx = positions[a].x - positions[b].x;
        let dy = positions[a].y - positions[b].y;
        let distance = dx.hypot(dy).max(MIN_DISTANCE);
        let force = distance * distance / k * weight;
        displacements[a].x -= dx / distance * force;
        displacements[a].y -= dy / distance * force;
        displacements[b].x += dx / distance * force;
        displacements[b].y += dy / distance * force;
    }

    // Move each node, capping the step at the current temperature
    for (position, displacement) in positions.iter_mut().zip(&displacements) {
        let length = displacement.norm().max(MIN_DISTANCE);
        let capped = length.min(temperature);
        position.x += displacement.x / length * capped;
        position.y += displacement.y / length * capped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graphmap::UnGraphMap;
    use test_log::test;

    fn path_graph(len: u32) -> UnGraphMap<u32, ()> {
        let mut graph = UnGraphMap::new();
        for i in 0..len.saturating_sub(1) {
            graph.add_edge(i, i + 1, ());
        }
        graph
    }

    #[test]
    fn empty_graph_yields_empty_mapping() {
        let graph = UnGraphMap::<u32, ()>::new();
        let engine = FruchtermanReingold::default();
        let positions = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();
        assert!(positions.is_empty());
    }

    #[test]
    fn single_node_sits_at_center() {
        let mut graph = UnGraphMap::<u32, ()>::new();
        graph.add_node(7);

        let engine = FruchtermanReingold {
            center: Point::new(3.0, -2.0),
            ..Default::default()
        };
        let positions = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();
        assert_eq!(positions[&7], Point::new(3.0, -2.0));
    }

    #[test]
    fn positions_are_finite_and_within_scale() {
        let graph = path_graph(6);
        let engine = FruchtermanReingold {
            scale: 4.0,
            ..Default::default()
        };
        let positions = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();

        assert_eq!(positions.len(), 6);
        for point in positions.values() {
            assert!(point.is_finite());
            assert!(point.x.abs() <= 4.0 + 1e-9);
            assert!(point.y.abs() <= 4.0 + 1e-9);
        }
    }

    #[test]
    fn layout_is_deterministic() {
        let graph = path_graph(5);
        let engine = FruchtermanReingold::default();

        let first = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();
        let second = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn exhausted_time_budget_is_an_error() {
        let graph = path_graph(4);
        let engine = FruchtermanReingold {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };

        let err = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap_err();
        assert!(matches!(err, LayoutError::TimedOut(_)));
    }
}

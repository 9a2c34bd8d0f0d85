use super::{rescale, weighted_snapshot, Deadline, LayoutError};
use crate::{EdgeWeights, LayoutEngine, Point};
use fjadra as fj;
use petgraph::visit::{IntoNeighbors, IntoNodeIdentifiers};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Configuration for the force simulation layout backed by `fjadra`
///
/// Link attraction, many-body repulsion and weak positional gravity, the
/// combination ForceAtlas-style tools use for large disconnected graphs.
/// The simulation itself lives in the external crate; this engine only
/// feeds it the graph and collects the converged positions.
#[derive(Debug, Clone)]
pub struct ForceAtlas {
    /// Maximum number of simulation ticks
    pub iterations: usize,

    /// Half-extent of the final coordinate range
    pub scale: f64,

    /// Center of the final coordinate range
    pub center: Point,

    /// Optional wall-clock budget for the tick loop
    pub timeout: Option<Duration>,
}

impl Default for ForceAtlas {
    fn default() -> Self {
        Self {
            iterations: 2000,
            scale: 1.0,
            center: Point::new(0.0, 0.0),
            timeout: None,
        }
    }
}

impl<G> LayoutEngine<G> for ForceAtlas
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

        if nodes.len() <= 1 {
            return Ok(nodes.into_iter().map(|node| (node, self.center)).collect());
        }

        let index: HashMap<_, _> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let edges: Vec<(usize, usize)> = snapshot
            .all_edges()
            .map(|(a, b, _)| (index[&a], index[&b]))
            .collect();

        let sim_nodes: Vec<fj::Node> = nodes.iter().map(|_| fj::Node::default()).collect();

        // The positional forces keep disconnected components from
        // drifting apart indefinitely
        let mut simulation = fj::SimulationBuilder::default()
            .build(sim_nodes)
            .add_force("link", fj::Link::new(edges))
            .add_force("charge", fj::ManyBody::new())
            .add_force("x", fj::PositionX::new().strength(0.01))
            .add_force("y", fj::PositionY::new().strength(0.01));

        let deadline = Deadline::new(self.timeout);
        for _ in 0..self.iterations {
            deadline.check()?;
            simulation.tick(1);
            if simulation.finished() {
                break;
            }
        }

        let mut positions: Vec<Point> = simulation
            .positions()
            .map(|[x, y]| Point::new(x, y))
            .collect();
        rescale(&mut positions, self.scale, self.center);

        Ok(nodes.into_iter().zip(positions).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graphmap::UnGraphMap;
    use test_log::test;

    #[test]
    fn triangle_gets_finite_positions() {
        let mut graph = UnGraphMap::<u32, ()>::new();
        graph.add_edge(0, 1, ());
        graph.add_edge(1, 2, ());
        graph.add_edge(2, 0, ());

        let engine = ForceAtlas {
            iterations: 200,
            ..Default::default()
        };
        let positions = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();

        assert_eq!(positions.len(), 3);
        for point in positions.values() {
            assert!(point.is_finite());
            assert!(point.x.abs() <= 1.0 + 1e-9);
            assert!(point.y.abs() <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn single_node_sits_at_center() {
        let mut graph = UnGraphMap::<u32, ()>::new();
        graph.add_node(9);

        let engine = ForceAtlas {
            center: Point::new(2.0, 2.0),
            ..Default::default()
        };
        let positions = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap();
        assert_eq!(positions[&9], Point::new(2.0, 2.0));
    }

    #[test]
    fn exhausted_time_budget_is_an_error() {
        let mut graph = UnGraphMap::<u32, ()>::new();
        graph.add_edge(0, 1, ());

        let engine = ForceAtlas {
            timeout: Some(Duration::ZERO),
            ..Default::default()
        };
        let err = engine.layout(&graph, &|_: u32, _: u32| 1.0).unwrap_err();
        assert!(matches!(err, LayoutError::TimedOut(_)));
    }
}

use super::{rescale, seed_circle, weighted_snapshot, Deadline, LayoutError};
use crate::{EdgeWeights, LayoutEngine, Point};
use petgraph::algo::dijkstra;
use petgraph::visit::{EdgeRef, IntoNeighbors, IntoNodeIdentifiers};
use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

/// Ideal distance assigned to node pairs with no connecting path
const DISCONNECTED_DISTANCE: f64 = 1e6;

/// Distances below this are clamped before dividing
const MIN_DISTANCE: f64 = 1e-9;

/// Configuration for the Kamada-Kawai stress layout
///
/// Shortest-path lengths between all node pairs (edge weight taken as
/// distance) define ideal geometric distances; stress majorization sweeps
/// then move every node toward the placement those distances prescribe.
#[derive(Debug, Clone)]
pub struct KamadaKawai {
    /// Number of stress majorization sweeps
    pub iterations: usize,

    /// Half-extent of the final coordinate range
    pub scale: f64,

    /// Center of the final coordinate range
    pub center: Point,

    /// Optional wall-clock budget for the iteration loop
    pub timeout: Option<Duration>,
}

impl Default for KamadaKawai {
    fn default() -> Self {
        Self {
            iterations: 50,
            scale: 1.0,
            center: Point::new(0.0, 0.0),
            timeout: None,
        }
    }
}

impl<G> LayoutEngine<G> for KamadaKawai
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

        // All-pairs shortest paths; pairs in different components keep the
        // large filler distance, which makes their pull negligible
        let mut ideal = vec![vec![DISCONNECTED_DISTANCE; nodes.len()]; nodes.len()];
        for (i, &node) in nodes.iter().enumerate() {
            let paths = dijkstra(&snapshot, node, None, |edge| *edge.weight());
            for (other, distance) in paths {
                let j = index[&other];
                if i != j {
                    ideal[i][j] = distance.max(MIN_DISTANCE);
                }
            }
        }

        let mut positions = seed_circle(nodes.len());
        let deadline = Deadline::new(self.timeout);

        for _ in 0..self.iterations {
            deadline.check()?;
            majorize(&mut positions, &ideal);
        }

        rescale(&mut positions, self.scale, self.center);

        Ok(nodes.into_iter().zip(positions).collect())
    }
}

/// One Guttman transform sweep: move every node to the weighted average
/// placement its ideal distances prescribe
fn majorize(positions: &mut Vec<Point>, ideal: &[Vec<f64>]) {
    let mut next = Vec::with_capacity(positions.len());

    for i in 0..positions.len() {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut total = 0.0;

        for j in 0..positions.len() {
            if i == j {
                continue;
            }

            let target = ideal[i][j];
            let weight = 1.0 / (target * target);
            let dx = positions[i].x - positions[j].x;
            let dy = positions[i].y - positions[j].y;
            let distance = dx.hypot(dy).max(MIN_DISTANCE);

            sum_x += weight * (positions[j].x + target * dx / distance);
            sum_y += weight * (positions[j].y + target * dy / distance);
            total += weight;
        }

        next.push(Point::new(sum_x / total, sum_y / total));
    }

    *positions = next;
}

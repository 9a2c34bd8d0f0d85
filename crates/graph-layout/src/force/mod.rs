mod fruchterman;
mod kamada;

#[cfg(feature = "force-sim")]
mod atlas;

pub use fruchterman::FruchtermanReingold;
pub use kamada::KamadaKawai;

#[cfg(feature = "force-sim")]
pub use atlas::ForceAtlas;

use crate::{EdgeWeights, Point};
use petgraph::graphmap::UnGraphMap;
use petgraph::visit::{IntoNeighbors, IntoNodeIdentifiers};
use std::f64::consts::TAU;
use std::hash::Hash;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that can occur during force layout computation
#[derive(Debug, Error)]
pub enum LayoutError {
    /// The iteration loop ran out of wall-clock budget
    #[error("layout did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Tracks the optional wall-clock budget of an iteration loop
pub(crate) struct Deadline {
    start: Instant,
    limit: Option<Duration>,
}

impl Deadline {
    pub(crate) fn new(limit: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            limit,
        }
    }

    pub(crate) fn check(&self) -> Result<(), LayoutError> {
        match self.limit {
            Some(limit) if self.start.elapsed() >= limit => Err(LayoutError::TimedOut(limit)),
            _ => Ok(()),
        }
    }
}

/// Convert any visitable graph into an undirected weighted snapshot
///
/// Self loops are skipped: GraphMap rejects them and they exert no force
/// on a layout anyway.
pub(crate) fn weighted_snapshot<G, W>(graph: G, weights: &W) -> UnGraphMap<G::NodeId, f64>
where
    G: IntoNodeIdentifiers + IntoNeighbors,
    G::NodeId: Copy + Ord + Hash,
    W: EdgeWeights<G::NodeId>,
{
    let mut snapshot = UnGraphMap::new();
    for node in graph.node_identifiers() {
        snapshot.add_node(node);
    }
    for node in graph.node_identifiers() {
        for next in graph.neighbors(node) {
            if node != next && !snapshot.contains_edge(node, next) {
                snapshot.add_edge(node, next, weights.weight(node, next));
            }
        }
    }
    snapshot
}

/// Deterministic initial placement on a unit circle
pub(crate) fn seed_circle(count: usize) -> Vec<Point> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            Point::new(angle.cos(), angle.sin())
        })
        .collect()
}

/// Center positions on their mean, scale the largest absolute coordinate
/// to `scale`, then translate by `center`
pub(crate) fn rescale(points: &mut [Point], scale: f64, center: Point) {
    if points.is_empty() {
        return;
    }

    let count = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / count;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / count;

    let mut limit: f64 = 0.0;
    for point in points.iter_mut() {
        point.x -= mean_x;
        point.y -= mean_y;
        limit = limit.max(point.x.abs()).max(point.y.abs());
    }

    if limit > 0.0 {
        for point in points.iter_mut() {
            point.x *= scale / limit;
            point.y *= scale / limit;
        }
    }

    for point in points.iter_mut() {
        point.x += center.x;
        point.y += center.y;
    }
}

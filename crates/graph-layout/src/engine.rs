use crate::{EdgeWeights, Point};
use std::collections::HashMap;
use std::hash::Hash;

/// A layout engine that can compute positions for graph nodes
///
/// This trait is generic over the graph type `G`, allowing different layout
/// engines to work with different graph types:
/// - Force-directed layouts implement it for any graph with neighbor access
/// - Distance-based layouts can specify their own graph requirements
pub trait LayoutEngine<G> {
    /// The type used to identify nodes in the graph
    type NodeId: Copy + Ord + Hash;

    /// The error type returned when layout computation fails
    type Error;

    /// Compute node positions for the given graph
    ///
    /// # Errors
    /// Returns an error if the layout computation fails (e.g., the
    /// configured time budget is exhausted before the iteration loop
    /// completes)
    fn layout<W>(&self, graph: G, weights: &W) -> Result<HashMap<Self::NodeId, Point>, Self::Error>
    where
        W: EdgeWeights<Self::NodeId>;
}

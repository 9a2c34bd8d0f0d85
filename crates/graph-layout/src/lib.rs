//! Generic graph layout algorithms
//!
//! This crate provides generic layout algorithms for graphs that work with
//! any graph data structure through petgraph's visitor traits. It works
//! with any graph implementing petgraph's visitor traits.
//!
//! # Layout Engines
//!
//! - [`FruchtermanReingold`]: classic spring layout for undirected graphs
//! - [`KamadaKawai`]: stress-based layout over shortest-path distances
//! - [`ForceAtlas`]: force simulation backed by the `fjadra` crate
//!   (requires the `force-sim` feature)
//!
//! # Example
//!
//! ```
//! use graph_layout::{FruchtermanReingold, LayoutEngine};
//! use petgraph::graphmap::UnGraphMap;
//!
//! // Create a graph
//! let mut graph = UnGraphMap::new();
//! graph.add_edge(1, 2, ());
//! graph.add_edge(2, 3, ());
//!
//! // Create a layout engine
//! let engine = FruchtermanReingold::default();
//!
//! // Provide edge weights
//! let weights = |_a: i32, _b: i32| 1.0;
//!
//! let positions = engine.layout(&graph, &weights).unwrap();
//! assert_eq!(positions.len(), 3);
//! ```

mod engine;
mod geometry;
mod weights;

pub mod force;

// Re-export core types and traits
pub use engine::LayoutEngine;
pub use geometry::{Point, Vec2};
pub use weights::EdgeWeights;

// Re-export petgraph visitor traits for graph abstraction
pub use petgraph::visit::{GraphBase, IntoNeighbors, IntoNodeIdentifiers};

// Re-export force layout types
pub use force::{FruchtermanReingold, KamadaKawai, LayoutError};

#[cfg(feature = "force-sim")]
pub use force::ForceAtlas;

/// Whether the external force simulation backend was compiled in.
///
/// When this returns `false`, [`ForceAtlas`] is unavailable and callers
/// should degrade to [`FruchtermanReingold`].
pub fn force_sim_available() -> bool {
    cfg!(feature = "force-sim")
}

//! Input schema and in-memory graph for the music map pipeline
//!
//! The input document comes from the upstream graph constructor as JSON;
//! this crate parses it into a [`MusicGraph`] (a petgraph with full node
//! and edge attributes) and computes descriptive statistics over it.

mod graph;
mod loader;
mod schema;
mod stats;

pub use graph::{EndpointPolicy, MusicGraph, UnknownEndpoint};
pub use loader::{load_path, load_reader, LoadError};
pub use schema::{EdgeEntry, EdgeRecord, GraphDocument, GraphSection, NodeEntry, NodeRecord};
pub use stats::{AttributeRange, GraphStats, StatsError};

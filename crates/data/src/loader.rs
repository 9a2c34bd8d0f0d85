use crate::graph::UnknownEndpoint;
use crate::{EndpointPolicy, GraphDocument, MusicGraph};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while turning an input document into a [`MusicGraph`]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input path does not exist
    #[error("input file {path} not found")]
    NotFound { path: PathBuf },

    /// The input exists but could not be read
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The document is not valid JSON or violates the schema
    #[error("malformed graph document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The strict endpoint policy rejected an edge
    #[error(transparent)]
    UnknownEndpoint(#[from] UnknownEndpoint),
}

/// Load a graph document from a file path
pub fn load_path(path: impl AsRef<Path>, policy: EndpointPolicy) -> Result<MusicGraph, LoadError> {
    let path = path.as_ref();
    info!(path = %path.display(), "loading graph");

    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound {
            path: path.to_path_buf(),
        },
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    load_reader(BufReader::new(file), policy)
}

/// Load a graph document from any reader
pub fn load_reader(reader: impl Read, policy: EndpointPolicy) -> Result<MusicGraph, LoadError> {
    let document: GraphDocument = serde_json::from_reader(reader)?;
    let mut graph = MusicGraph::new();

    for node in document.graph.nodes {
        graph.add_node(node.data);
    }
    for edge in document.graph.edges {
        graph.add_edge(edge.data, policy)?;
    }

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}

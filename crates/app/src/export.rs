use crate::adapter::{Algorithm, LayoutOutcome};
use chrono::{DateTime, Local};
use graph_layout::Point;
use musicmap_data::MusicGraph;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::info;

/// Run-level information attached to every exported layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMetadata {
    pub generated_at: DateTime<Local>,
    pub algorithm: Algorithm,
    pub node_count: usize,
    pub edge_count: usize,
    pub capability_available: bool,

    // The snake_case spelling is part of the documented output format
    #[serde(rename = "fallback_occurred")]
    pub fallback_occurred: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sanitized_nodes: Vec<String>,
}

/// One positioned node with its metadata, as written to the output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePlacement {
    pub x: f64,
    pub y: f64,
    pub name: String,
    pub artist: String,
    pub album: String,
    pub popularity: f64,
    pub release_year: i32,
    pub size: f64,
    pub color: String,
}

/// The exported document: metadata envelope plus the layout mapping
///
/// A BTreeMap keeps the serialized node order stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub metadata: RunMetadata,
    pub layout: BTreeMap<String, NodePlacement>,
}

impl LayoutDocument {
    /// Merge node metadata with the computed positions
    ///
    /// Every node of the graph appears in the output exactly once; nodes
    /// the layout did not place get the origin.
    pub fn assemble(
        graph: &MusicGraph,
        outcome: &LayoutOutcome,
        generated_at: DateTime<Local>,
        capability_available: bool,
    ) -> Self {
        let layout = graph
            .nodes()
            .map(|record| {
                let position = outcome
                    .positions
                    .get(&record.id)
                    .copied()
                    .unwrap_or(Point::new(0.0, 0.0));
                let placement = NodePlacement {
                    x: position.x,
                    y: position.y,
                    name: record.name.clone(),
                    artist: record.artist.clone(),
                    album: record.album.clone(),
                    popularity: record.popularity,
                    release_year: record.release_year,
                    size: record.size,
                    color: record.color.clone(),
                };
                (record.id.clone(), placement)
            })
            .collect();

        Self {
            metadata: RunMetadata {
                generated_at,
                algorithm: outcome.algorithm,
                node_count: graph.node_count(),
                edge_count: graph.edge_count(),
                capability_available,
                fallback_occurred: outcome.fallback_occurred,
                sanitized_nodes: outcome.sanitized_nodes.clone(),
            },
            layout,
        }
    }
}

/// Errors raised while writing the output document
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to stage a temporary file next to {path}")]
    Stage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize the layout document")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to move the finished document to {path}")]
    Persist {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Write the document through a temp file in the destination directory so
/// the target path never holds a partially written document
pub fn write_document(path: &Path, document: &LayoutDocument) -> Result<(), ExportError> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = NamedTempFile::new_in(directory).map_err(|source| ExportError::Stage {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::to_writer_pretty(&mut staged, document)?;
    staged.persist(path).map_err(|err| ExportError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;

    info!(path = %path.display(), "layout exported");
    Ok(())
}

/// Default output filename derived from the run timestamp
pub fn default_output_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "music-map-layout_{}.json",
        now.format("%Y%m%d_%H%M%S")
    ))
}

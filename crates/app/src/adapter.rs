use clap::ValueEnum;
use graph_layout::{FruchtermanReingold, KamadaKawai, LayoutEngine, LayoutError, Point};
use musicmap_data::MusicGraph;
use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Layout algorithms selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    ForceAtlas2,
    Spring,
    KamadaKawai,
    FruchtermanReingold,
}

impl Algorithm {
    /// Iteration count used when the caller does not override it
    fn default_iterations(self) -> usize {
        match self {
            Algorithm::ForceAtlas2 => 2000,
            _ => 50,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Algorithm::ForceAtlas2 => "force_atlas2",
            Algorithm::Spring => "spring",
            Algorithm::KamadaKawai => "kamada_kawai",
            Algorithm::FruchtermanReingold => "fruchterman_reingold",
        })
    }
}

/// Tuning knobs shared by all layout algorithms
#[derive(Debug, Clone)]
pub struct LayoutOptions {
    /// Iteration count; `None` means the per-algorithm default
    pub iterations: Option<usize>,

    /// Optimal distance between connected nodes (spring variants only)
    pub k: f64,

    /// Half-extent of the final coordinate range
    pub scale: f64,

    /// Center of the final coordinate range
    pub center: Point,

    /// Wall-clock budget for the layout stage
    pub timeout: Option<Duration>,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            iterations: None,
            k: 1.0,
            scale: 1.0,
            center: Point::new(0.0, 0.0),
            timeout: None,
        }
    }
}

/// Result of the layout stage: positions keyed by track id, plus the
/// recovery flags the run metadata reports
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub positions: HashMap<String, Point>,

    /// The requested algorithm, reported even when the fallback ran
    pub algorithm: Algorithm,

    pub fallback_occurred: bool,

    /// Track ids whose coordinates came back non-finite and were replaced
    pub sanitized_nodes: Vec<String>,
}

/// Compute positions for every node of the graph
pub fn compute_layout(
    graph: &MusicGraph,
    algorithm: Algorithm,
    options: &LayoutOptions,
) -> Result<LayoutOutcome, LayoutError> {
    compute_with_capability(graph, algorithm, options, graph_layout::force_sim_available())
}

/// Same as [`compute_layout`] with the capability probe made explicit so
/// the fallback path stays testable
pub(crate) fn compute_with_capability(
    graph: &MusicGraph,
    algorithm: Algorithm,
    options: &LayoutOptions,
    capability: bool,
) -> Result<LayoutOutcome, LayoutError> {
    // The iterative solvers divide by the node count; place the degenerate
    // graphs without involving them
    if graph.node_count() <= 1 {
        let positions = graph
            .nodes()
            .map(|record| (record.id.clone(), options.center))
            .collect();
        return Ok(LayoutOutcome {
            positions,
            algorithm,
            fallback_occurred: false,
            sanitized_nodes: Vec::new(),
        });
    }

    info!(
        %algorithm,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "computing layout"
    );

    let (raw, fallback_occurred) = match algorithm {
        Algorithm::ForceAtlas2 if capability => (run_force_atlas(graph, options)?, false),
        Algorithm::ForceAtlas2 => {
            warn!("force simulation backend unavailable, falling back to the spring layout");
            let raw = run_spring(graph, options, algorithm.default_iterations())?;
            (raw, true)
        }
        Algorithm::Spring | Algorithm::FruchtermanReingold => {
            let raw = run_spring(graph, options, algorithm.default_iterations())?;
            (raw, false)
        }
        Algorithm::KamadaKawai => (run_kamada(graph, options)?, false),
    };

    // Non-finite coordinates would corrupt the exported JSON; substitute
    // the origin and record the node
    let mut sanitized_nodes = Vec::new();
    let mut positions = HashMap::with_capacity(raw.len());
    for (index, point) in raw {
        let id = graph.id_of(index).to_string();
        if point.is_finite() {
            positions.insert(id, point);
        } else {
            warn!(node = %id, "layout produced non-finite coordinates, substituting the origin");
            sanitized_nodes.push(id.clone());
            positions.insert(id, Point::new(0.0, 0.0));
        }
    }
    sanitized_nodes.sort();

    Ok(LayoutOutcome {
        positions,
        algorithm,
        fallback_occurred,
        sanitized_nodes,
    })
}

fn run_spring(
    graph: &MusicGraph,
    options: &LayoutOptions,
    default_iterations: usize,
) -> Result<HashMap<NodeIndex, Point>, LayoutError> {
    let engine = FruchtermanReingold {
        iterations: options.iterations.unwrap_or(default_iterations),
        k: options.k,
        scale: options.scale,
        center: options.center,
        timeout: options.timeout,
    };
    let weights = |a: NodeIndex, b: NodeIndex| graph.weight_between(a, b);
    engine.layout(graph.petgraph(), &weights)
}

fn run_kamada(
    graph: &MusicGraph,
    options: &LayoutOptions,
) -> Result<HashMap<NodeIndex, Point>, LayoutError> {
    let engine = KamadaKawai {
        iterations: options
            .iterations
            .unwrap_or(Algorithm::KamadaKawai.default_iterations()),
        scale: options.scale,
        center: options.center,
        timeout: options.timeout,
    };
    let weights = |a: NodeIndex, b: NodeIndex| graph.weight_between(a, b);
    engine.layout(graph.petgraph(), &weights)
}

#[cfg(feature = "force-sim")]
fn run_force_atlas(
    graph: &MusicGraph,
    options: &LayoutOptions,
) -> Result<HashMap<NodeIndex, Point>, LayoutError> {
    let engine = graph_layout::ForceAtlas {
        iterations: options
            .iterations
            .unwrap_or(Algorithm::ForceAtlas2.default_iterations()),
        scale: options.scale,
        center: options.center,
        timeout: options.timeout,
    };
    let weights = |a: NodeIndex, b: NodeIndex| graph.weight_between(a, b);
    engine.layout(graph.petgraph(), &weights)
}

#[cfg(not(feature = "force-sim"))]
fn run_force_atlas(
    graph: &MusicGraph,
    options: &LayoutOptions,
) -> Result<HashMap<NodeIndex, Point>, LayoutError> {
    // The capability check routes force_atlas2 to the spring path before
    // this can be reached
    run_spring(graph, options, Algorithm::ForceAtlas2.default_iterations())
}

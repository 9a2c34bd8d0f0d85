use crate::adapter::{self, Algorithm, LayoutOptions};
use crate::export::{self, ExportError, LayoutDocument};
use chrono::{DateTime, Local};
use graph_layout::LayoutError;
use musicmap_data::{load_path, EndpointPolicy, GraphStats, LoadError, StatsError};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Pipeline stages, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Load,
    Statistics,
    Layout,
    Export,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Load => "load",
            Stage::Statistics => "statistics",
            Stage::Layout => "layout",
            Stage::Export => "export",
        })
    }
}

/// A stage failure; the run is single-pass and stops at the first one
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("load stage failed")]
    Load(#[from] LoadError),

    #[error("statistics stage failed")]
    Statistics(#[from] StatsError),

    #[error("layout stage failed")]
    Layout(#[from] LayoutError),

    #[error("export stage failed")]
    Export(#[from] ExportError),
}

impl PipelineError {
    /// The stage that produced the failure
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Load(_) => Stage::Load,
            PipelineError::Statistics(_) => Stage::Statistics,
            PipelineError::Layout(_) => Stage::Layout,
            PipelineError::Export(_) => Stage::Export,
        }
    }
}

/// Configuration of one pipeline run
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub algorithm: Algorithm,
    pub options: LayoutOptions,
    pub policy: EndpointPolicy,
    pub print_stats: bool,

    /// Injected so the default output name and the exported timestamp are
    /// reproducible
    pub now: DateTime<Local>,
}

/// What a successful run produced
#[derive(Debug)]
pub struct RunReport {
    pub output: PathBuf,
    pub document: LayoutDocument,
}

impl Pipeline {
    /// Run load -> statistics -> layout -> export, stopping at the first
    /// failing stage
    pub fn run(&self) -> Result<RunReport, PipelineError> {
        let graph = load_path(&self.input, self.policy)?;

        if self.print_stats {
            let stats = GraphStats::compute(&graph)?;
            println!("{stats}");
        }

        let outcome = adapter::compute_layout(&graph, self.algorithm, &self.options)?;

        let document = LayoutDocument::assemble(
            &graph,
            &outcome,
            self.now,
            graph_layout::force_sim_available(),
        );
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| export::default_output_path(self.now));
        export::write_document(&output, &document)?;

        info!(path = %output.display(), "run finished");
        Ok(RunReport { output, document })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use test_log::test;

    const SAMPLE: &str = r#"{
        "graph": {
            "nodes": [
                {"data": {"id": "t1", "name": "Song One", "popularity": 42}},
                {"data": {"id": "t2"}},
                {"data": {"id": "t3"}}
            ],
            "edges": [
                {"data": {"source": "t1", "target": "t2", "weight": 5}},
                {"data": {"source": "t2", "target": "t3"}}
            ]
        }
    }"#;

    fn fixed_clock() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap()
    }

    fn pipeline_for(dir: &std::path::Path, input: &str) -> Pipeline {
        let input_path = dir.join("input.json");
        fs::write(&input_path, input).unwrap();

        Pipeline {
            input: input_path,
            output: Some(dir.join("out.json")),
            algorithm: Algorithm::Spring,
            options: LayoutOptions {
                iterations: Some(20),
                ..Default::default()
            },
            policy: EndpointPolicy::Lenient,
            print_stats: false,
            now: fixed_clock(),
        }
    }

    #[test]
    fn full_run_exports_every_node() {
        let dir = tempfile::tempdir().unwrap();
        let report = pipeline_for(dir.path(), SAMPLE).run().unwrap();

        assert!(report.output.exists());
        let document: LayoutDocument =
            serde_json::from_str(&fs::read_to_string(&report.output).unwrap()).unwrap();
        assert_eq!(document.layout.len(), 3);
        assert_eq!(document.metadata.node_count, 3);
        assert_eq!(document.metadata.edge_count, 2);
        assert_eq!(document.metadata.algorithm, Algorithm::Spring);
        assert!(!document.metadata.fallback_occurred);
    }

    #[test]
    fn missing_input_fails_in_the_load_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_for(dir.path(), SAMPLE);
        pipeline.input = dir.path().join("absent.json");

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.stage(), Stage::Load);
    }

    #[test]
    fn malformed_input_fails_in_the_load_stage() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_for(dir.path(), "{broken");

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.stage(), Stage::Load);
    }

    #[test]
    fn stats_on_an_empty_graph_fails_in_the_statistics_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_for(dir.path(), r#"{"graph": {"nodes": [], "edges": []}}"#);
        pipeline.print_stats = true;

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.stage(), Stage::Statistics);
    }

    #[test]
    fn empty_graph_without_stats_exports_an_empty_layout() {
        let dir = tempfile::tempdir().unwrap();
        let pipeline = pipeline_for(dir.path(), r#"{"graph": {"nodes": [], "edges": []}}"#);

        let report = pipeline.run().unwrap();
        assert!(report.document.layout.is_empty());
        assert_eq!(report.document.metadata.node_count, 0);
    }

    #[test]
    fn strict_policy_flows_through_to_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let input = r#"{"graph": {"nodes": [], "edges": [{"data": {"source": "x", "target": "y"}}]}}"#;
        let mut pipeline = pipeline_for(dir.path(), input);
        pipeline.policy = EndpointPolicy::Strict;

        let err = pipeline.run().unwrap_err();
        assert_eq!(err.stage(), Stage::Load);

        // The lenient default accepts the same document
        pipeline.policy = EndpointPolicy::Lenient;
        let report = pipeline.run().unwrap();
        assert_eq!(report.document.layout.len(), 2);
    }
}

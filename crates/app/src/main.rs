mod adapter;
mod driver;
mod export;

use adapter::{Algorithm, LayoutOptions};
use anyhow::Result;
use chrono::Local;
use clap::Parser;
use driver::Pipeline;
use musicmap_data::EndpointPolicy;
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{prelude::*, EnvFilter};

/// Precompute a 2D layout for a music graph and export it to JSON
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input JSON file from the graph constructor
    input_file: PathBuf,

    /// Layout algorithm to use
    #[arg(short, long, value_enum, default_value_t = Algorithm::ForceAtlas2)]
    algorithm: Algorithm,

    /// Output JSON file (default: music-map-layout_<timestamp>.json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of layout iterations (default: 2000 for force_atlas2, 50 otherwise)
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Print graph statistics before computing the layout
    #[arg(short, long)]
    stats: bool,

    /// Reject edges referencing nodes missing from the input
    #[arg(long)]
    strict: bool,

    /// Abort the layout stage after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let pipeline = Pipeline {
        input: args.input_file,
        output: args.output,
        algorithm: args.algorithm,
        options: LayoutOptions {
            iterations: args.iterations,
            timeout: args.timeout.map(Duration::from_secs),
            ..Default::default()
        },
        policy: if args.strict {
            EndpointPolicy::Strict
        } else {
            EndpointPolicy::Lenient
        },
        print_stats: args.stats,
        now: Local::now(),
    };

    let report = pipeline
        .run()
        .inspect_err(|e| error!(stage = %e.stage(), "pipeline failed"))?;

    println!("Layout written to {}", report.output.display());
    Ok(())
}

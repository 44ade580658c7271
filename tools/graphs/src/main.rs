mod assessment;
mod planning;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use graphs_common::Error;
use graphs_routing::Map;

/// Offline urban-infrastructure routing and planning engine.
#[derive(Debug, Parser)]
#[command(name = "graphs")]
struct Cli {
    /// Number of houses to sample.
    houses: i64,

    /// Number of facilities to sample.
    facilities: i64,

    /// Import map from .csv or .pbf.
    #[arg(short = 'i', long = "import", default_value = "NNMap.pbf")]
    import: PathBuf,

    /// Export graph as .csv on finish.
    #[arg(short = 'e', long = "export")]
    export: bool,

    /// Invalidate the cache and rebuild.
    #[arg(short = 'r', long = "recache")]
    recache: bool,

    /// Verbose logging.
    #[arg(short = 'l', long = "log")]
    log: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let extension = cli.import.extension().and_then(|s| s.to_str());

    let map = match extension {
        Some("csv") => graphs_csv::import(&cli.import)?,
        Some("pbf") => load_pbf(&cli.import, cli.recache)?,
        _ => return Err(Error::FormatUnrecognized(cli.import.clone()).into()),
    };

    let houses = cli.houses.max(0) as usize;
    let facilities = cli.facilities.max(0) as usize;

    let map = Arc::new(map);
    let assessment_map = Arc::clone(&map);
    let planning_map = Arc::clone(&map);

    let assessment_handle =
        thread::spawn(move || assessment::run(&assessment_map, houses, facilities));
    let planning_handle = thread::spawn(move || planning::run(&planning_map, houses, facilities));

    assessment_handle.join().expect("assessment worker panicked");
    planning_handle.join().expect("planning worker panicked");

    if cli.export {
        graphs_csv::export("Graph.csv", map.graph())?;
        tracing::info!("wrote Graph.csv");
    }

    Ok(())
}

fn load_pbf(path: &Path, recache: bool) -> anyhow::Result<Map> {
    if recache {
        graphs_io::recache()?;
    } else if let Some(cached) = graphs_io::load(path)? {
        return Ok(cached);
    }

    if !path.exists() {
        return Err(Error::InputNotFound(path.to_path_buf()).into());
    }

    let map = graphs_geometry::import(path)?;
    graphs_io::store(path, &map)?;
    Ok(map)
}

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use ::log::{LevelFilter, info};
use anyhow::Context;
use glob::glob;
use postman::{errors::ReadError, log::build_logger_for_verbosity, prelude::*, utils::signal_handling};
use structopt::StructOpt;

const RESULT_FILE: &str = "result.edges";

/// Solves every subgraph-<vertex>.edges file of a directory written by divide_by_bridge,
/// using division-<vertex>.edges as cut edges where present, and collects all doubled
/// edges in result.edges
#[derive(StructOpt)]
struct Opts {
    #[structopt(parse(from_os_str))]
    directory: PathBuf,

    /// Matching backend: highs or naive
    #[structopt(short, long, default_value = "highs")]
    backend: BackendChoice,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

/// Total distance of an edge list; a missing or empty list counts as zero
fn edge_list_distance(path: &Path) -> anyhow::Result<Weight> {
    if !path.is_file() {
        return Ok(0);
    }
    match RouteNetwork::try_read_edge_list_file(path) {
        Ok(net) => Ok(net.total_distance()),
        Err(ReadError::Empty) => Ok(0),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);
    signal_handling::initialize();

    let dir = opts.directory.as_path();
    let pattern = dir.join(format!("{COMPONENT_PREFIX}*.{EDGE_LIST_EXTENSION}"));
    let pattern = pattern
        .to_str()
        .context("directory name is not valid unicode")?;

    let result_path = dir.join(RESULT_FILE);
    let mut result = BufWriter::new(File::create(&result_path)?);
    let solver = BorderSolver::new(opts.backend);

    for path in glob(pattern)?.flatten() {
        let Some(name) = component_name(&path) else {
            continue;
        };

        let network = RouteNetwork::try_read_edge_list_file(&path)
            .with_context(|| format!("reading {}", path.display()))?;

        let division = division_file(dir, name);
        let cuts = if division.is_file() {
            match RouteNetwork::try_read_edge_list_file(&division) {
                Ok(cuts) => cuts,
                Err(ReadError::Empty) => RouteNetwork::new(),
                Err(e) => return Err(e).with_context(|| format!("reading {}", division.display())),
            }
        } else {
            RouteNetwork::new()
        };

        info!(
            "Solving {} with {} cut edges",
            path.display(),
            cuts.number_of_edges()
        );

        let mut report = Vec::new();
        writeln!(report, "# ========================================")?;
        writeln!(report, "# Checking for the graph {:?}", path.file_name().unwrap_or_default())?;
        writeln!(report, "# ========================================")?;

        write_border_outcome(&mut report, solver.solve(&network, &cuts))
            .with_context(|| format!("solving {}", path.display()))?;

        std::io::stdout().write_all(&report)?;
        result.write_all(&report)?;
    }

    result.flush()?;
    drop(result);
    println!();
    println!("The result is written to {:?}.", result_path);

    let bridges = edge_list_distance(&dir.join(BRIDGE_LIST_FILE))?;
    let doubled = edge_list_distance(&result_path)?;
    println!("@ Total distance of bridge edges = {bridges}");
    println!("@ Total distance of doubled edges other than bridge = {doubled}");
    println!("@ Total distance of doubled edges = {}", bridges + doubled);

    Ok(())
}

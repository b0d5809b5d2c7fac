use std::{path::PathBuf, time::Duration};

use ::log::{LevelFilter, info};
use postman::{errors::ReadError, log::build_logger_for_verbosity, prelude::*, utils::{parse_seconds, signal_handling}};
use structopt::StructOpt;

/// Solves a network that is partitioned along a set of cut edges. Each cut edge is tried
/// both traversed once and twice, so the running time grows with 2^(number of cut edges)
/// and with 2^(border vertices) per component.
#[derive(StructOpt)]
struct Opts {
    /// Edge list of the network
    #[structopt(parse(from_os_str))]
    instance: PathBuf,

    /// Edge list of the cut edges; every line has to match an edge of the network
    #[structopt(parse(from_os_str))]
    cuts: Option<PathBuf>,

    /// Matching backend: highs or naive
    #[structopt(short, long, default_value = "highs")]
    backend: BackendChoice,

    /// Stop the search after this many seconds. If the cut edge enumeration has started,
    /// the best assignment found so far is reported; otherwise the run fails.
    #[structopt(short, long, parse(try_from_str = parse_seconds))]
    timeout: Option<Duration>,

    /// Print the result as JSON instead of the edge list report
    #[structopt(long)]
    json: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);
    signal_handling::initialize();

    let network = RouteNetwork::try_read_edge_list_file(&opts.instance)?;
    let cuts = match &opts.cuts {
        Some(path) => match RouteNetwork::try_read_edge_list_file(path) {
            Ok(cuts) => cuts,
            Err(ReadError::Empty) => RouteNetwork::new(),
            Err(e) => return Err(e.into()),
        },
        None => RouteNetwork::new(),
    };
    info!(
        "Loaded network with {} edges and {} cut edges",
        network.number_of_edges(),
        cuts.number_of_edges()
    );

    let solution = BorderSolver::new(opts.backend)
        .with_timeout(opts.timeout)
        .solve(&network, &cuts)?;

    let stdout = std::io::stdout().lock();
    if opts.json {
        write_border_solution_json(stdout, &solution)?;
        println!();
    } else {
        write_border_solution(stdout, &solution)?;
    }

    Ok(())
}

use std::{path::PathBuf, time::Duration};

use ::log::{LevelFilter, info};
use postman::{log::build_logger_for_verbosity, prelude::*, utils::parse_seconds};
use structopt::StructOpt;

/// Computes a shortest closed route that traverses every edge of a network at least once
#[derive(StructOpt)]
struct Opts {
    /// Edge list with lines `<distance> <vertex> <vertex>`; read from stdin if omitted
    #[structopt(parse(from_os_str))]
    instance: Option<PathBuf>,

    /// Matching backend: highs or naive
    #[structopt(short, long, default_value = "highs")]
    backend: BackendChoice,

    /// Time limit for a single matching in seconds (highs only)
    #[structopt(short, long, parse(try_from_str = parse_seconds))]
    timeout: Option<Duration>,

    /// Print the result as JSON instead of the text report
    #[structopt(long)]
    json: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn load_network(path: &Option<PathBuf>) -> anyhow::Result<RouteNetwork> {
    if let Some(path) = path {
        Ok(RouteNetwork::try_read_edge_list_file(path)?)
    } else {
        let stdin = std::io::stdin().lock();
        Ok(RouteNetwork::try_read_edge_list(stdin)?)
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opts.verbose);

    let network = load_network(&opts.instance)?;
    info!(
        "Loaded network with {} vertices, {} edges and total distance {}",
        network.number_of_nodes(),
        network.number_of_edges(),
        network.total_distance()
    );

    let backend = opts
        .backend
        .with_timeout(opts.timeout);
    let solution = PostmanSolver::new(backend).solve(&network)?;

    let stdout = std::io::stdout().lock();
    if opts.json {
        write_solution_json(stdout, &solution)?;
        println!();
    } else {
        write_solution(stdout, &network, &solution)?;
    }

    Ok(())
}

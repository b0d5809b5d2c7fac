use std::{io::Write, path::PathBuf};

use ::log::LevelFilter;
use postman::{log::build_logger_for_verbosity, prelude::*};
use structopt::StructOpt;

/// Splits a network at its bridges and writes the bridges and every remaining component
/// as separate edge lists
#[derive(StructOpt)]
struct Opts {
    /// Edge list of the network
    #[structopt(parse(from_os_str))]
    instance: PathBuf,

    /// Existing directory receiving bridges.edges and subgraph-<vertex>.edges
    #[structopt(parse(from_os_str))]
    output_dir: PathBuf,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    build_logger_for_verbosity(LevelFilter::Info, opts.verbose);

    let network = RouteNetwork::try_read_edge_list_file(&opts.instance)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "[Graph Structure]")?;
    write_network(&mut stdout, &network)?;
    writeln!(stdout)?;

    let exported = export_bridge_partition(&network, &opts.output_dir)?;
    writeln!(
        stdout,
        "{} bridges of total distance {}, {} component files",
        exported.bridges.len(),
        total_weight(&exported.bridges),
        exported.component_files.len()
    )?;

    Ok(())
}

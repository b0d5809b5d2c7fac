use std::{
    path::PathBuf,
    sync::atomic::{AtomicU64, Ordering},
    time::Instant,
};

use ::log::{LevelFilter, info};
use itertools::Itertools;
use postman::{log::build_logger_for_verbosity, prelude::*};
use rand::{Rng, SeedableRng, seq::IteratorRandom};
use rand_pcg::Pcg64Mcg;
#[cfg(feature = "par")]
use rayon::prelude::*;
use structopt::*;

/// Solves random networks with both matching backends and with random cut sets, and
/// reports every instance on which the results disagree
#[derive(Debug, StructOpt)]
struct Opt {
    #[structopt(short, long, default_value = "1000")]
    repeats: u64,

    #[structopt(short, long, default_value = "1")]
    seed: u64,

    /// Maximum number of cut edges drawn for the border search
    #[structopt(short, long, default_value = "3")]
    cuts: usize,

    /// Directory receiving the edge lists of mismatching instances
    #[structopt(short = "w", long, parse(from_os_str))]
    write: Option<PathBuf>,

    /// Also write instances without mismatch
    #[structopt(short = "a", long)]
    write_all: bool,

    /// Verbose mode (-v, -vv, -vvv, etc.)
    #[structopt(short, long, parse(from_occurrences))]
    verbose: usize,
}

struct Timings {
    highs: AtomicU64,
    naive: AtomicU64,
    border: AtomicU64,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();
    build_logger_for_verbosity(LevelFilter::Warn, opt.verbose);

    let nodes = [8, 12, 16];
    let avg_deg = [2, 3, 4];

    let params = nodes
        .into_iter()
        .cartesian_product(avg_deg)
        .map(|(n, d)| (n, (d as f64 / (n - 1) as f64).min(1.0)))
        .collect_vec();

    let timings = Timings {
        highs: AtomicU64::new(0),
        naive: AtomicU64::new(0),
        border: AtomicU64::new(0),
    };
    let mismatches = AtomicU64::new(0);
    let total_instances = opt.repeats * params.len() as u64;

    let instances = (0..total_instances).map(|i| (i, params[(i % params.len() as u64) as usize]));

    #[cfg(feature = "par")]
    let instances = instances.collect_vec().into_par_iter();

    instances.for_each(|(i, (n, p))| {
        let rng = &mut Pcg64Mcg::seed_from_u64(opt.seed ^ i.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        let network = RouteNetwork::random_connected_gnp(rng, n, p, 20);

        match process_network(&opt, rng, &network, &timings) {
            Ok(true) => write_instance(&opt, i, &network, false),
            Ok(false) => {
                mismatches.fetch_add(1, Ordering::Relaxed);
                println!("Mismatch for instance {i} (n = {n}, p = {p:.3}): {network:?}");
                write_instance(&opt, i, &network, true);
            }
            Err(e) => println!("Instance {i} failed: {e}"),
        }

        if i % 100 == 0 && i > 0 {
            info!(
                "Completed {i:>7} of {total_instances:>7} | highs: {:>6}ms naive: {:>6}ms border: {:>6}ms",
                timings.highs.load(Ordering::Relaxed),
                timings.naive.load(Ordering::Relaxed),
                timings.border.load(Ordering::Relaxed),
            );
        }
    });

    println!(
        "{} mismatches in {total_instances} instances",
        mismatches.load(Ordering::Relaxed)
    );
    Ok(())
}

/// Returns whether all solvers agree
fn process_network(
    opt: &Opt,
    rng: &mut impl Rng,
    network: &RouteNetwork,
    timings: &Timings,
) -> Result<bool, PostmanError> {
    let time = Instant::now();
    let highs = PostmanSolver::new(HighsMatching::default()).solve(network)?;
    timings
        .highs
        .fetch_add(time.elapsed().as_millis() as u64, Ordering::Relaxed);

    let time = Instant::now();
    let naive = PostmanSolver::new(NaiveMatching).solve(network)?;
    timings
        .naive
        .fetch_add(time.elapsed().as_millis() as u64, Ordering::Relaxed);

    let k = rng.gen_range(0..=opt.cuts).min(network.number_of_edges() as usize);
    let mut cuts = RouteNetwork::new();
    for (_, edge) in network.edges().choose_multiple(rng, k) {
        let (u, v) = network.names_of_edge(&edge);
        cuts.add_named_edge(u, v, edge.weight());
    }

    let time = Instant::now();
    let border = BorderSolver::new(HighsMatching::default()).solve(network, &cuts)?;
    timings
        .border
        .fetch_add(time.elapsed().as_millis() as u64, Ordering::Relaxed);

    let expected = highs.traversed_distance();
    Ok(naive.traversed_distance() == expected && border.traversed_distance() == expected)
}

fn write_instance(opt: &Opt, i: u64, network: &RouteNetwork, mismatched: bool) {
    let Some(dir) = &opt.write else {
        return;
    };
    if !mismatched && !opt.write_all {
        return;
    }

    let path = dir.join(format!(
        "n{:>03}_m{:>04}_{i:06}.edges",
        network.number_of_nodes(),
        network.number_of_edges()
    ));
    if let Err(e) = network.try_write_edge_list_file(&path) {
        println!("Cannot write {}: {e}", path.display());
    }
}

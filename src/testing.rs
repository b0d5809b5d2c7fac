use std::fs;

use glob::glob;
use itertools::Itertools;
use rand::{Rng, SeedableRng, seq::IteratorRandom};
use rand_pcg::Pcg64Mcg;
use regex::Regex;

use crate::{errors::InvariantCheck, prelude::*};

/// Endless stream of small connected networks with at most a few odd vertices more than
/// the naive matching can handle comfortably
pub fn generate_random_network_stream(
    rng: &mut impl Rng,
    max_nodes: NumNodes,
) -> impl Iterator<Item = RouteNetwork> + '_ {
    std::iter::repeat_with(move || {
        let n = rng.gen_range(1..=max_nodes);
        let p = rng.gen_range(0.0..3.0 / n as f64).min(1.0);
        RouteNetwork::random_connected_gnp(rng, n, p, 10)
    })
}

/// Textbook Chinese postman on a connected network: pair all odd vertices of the whole
/// network by shortest paths, without bridge removal, contraction or splitting.
pub fn reference_traversed_distance(network: &RouteNetwork) -> Weight {
    let odd = odd_vertices(network, None);
    let distances = network.all_pairs_shortest_paths();
    let matched: Weight = if odd.is_empty() {
        0
    } else {
        NaiveMatching
            .min_weight_perfect_matching(&odd, &distances)
            .unwrap()
            .into_iter()
            .map(|(i, j)| distances.distance(odd[i], odd[j]).unwrap())
            .sum()
    };
    network.total_distance() + matched
}

#[test]
fn solver_matches_reference() {
    let rng = &mut Pcg64Mcg::seed_from_u64(0xc0ffee);
    let naive = PostmanSolver::new(NaiveMatching);
    let highs = PostmanSolver::new(HighsMatching::default());

    for net in generate_random_network_stream(rng, 14).take(200) {
        let expected = reference_traversed_distance(&net);

        let by_naive = naive.solve(&net).unwrap();
        let by_highs = highs.solve(&net).unwrap();

        assert_eq!(by_naive.traversed_distance(), expected, "{net:?}");
        assert_eq!(by_highs.traversed_distance(), expected, "{net:?}");
        assert_eq!(by_highs.skipped_components, 0);
        assert_eq!(
            by_highs.traversed_distance(),
            by_highs.base_distance + by_highs.bridge_distance() + by_highs.matched_distance()
        );
    }
}

#[test]
fn contraction_keeps_solution_and_invariants() {
    let rng = &mut Pcg64Mcg::seed_from_u64(0xbeef);
    for net in generate_random_network_stream(rng, 20).take(100) {
        let mut contracted = net.clone();
        contracted.remove_trivial_vertices();
        contracted.is_correct().unwrap();
        assert_eq!(contracted.total_distance(), net.total_distance());
        assert_eq!(contracted.number_of_components(), 1);
        assert_eq!(
            reference_traversed_distance(&contracted),
            reference_traversed_distance(&net)
        );
    }
}

#[test]
fn border_search_with_random_cuts_matches_plain_solver() {
    let rng = &mut Pcg64Mcg::seed_from_u64(0x5eed);
    let plain = PostmanSolver::new(NaiveMatching);
    let border = BorderSolver::new(NaiveMatching);

    let networks = generate_random_network_stream(rng, 10).take(100).collect_vec();
    for net in networks {
        let k = rng.gen_range(0..=3).min(net.number_of_edges() as usize);
        let mut cuts = RouteNetwork::new();
        for (_, edge) in net.edges().choose_multiple(rng, k) {
            let (u, v) = net.names_of_edge(&edge);
            cuts.add_named_edge(u, v, edge.weight());
        }

        let expected = plain.solve(&net).unwrap().traversed_distance();
        let solution = border.solve(&net, &cuts).unwrap();
        assert!(solution.complete);
        assert_eq!(solution.traversed_distance(), expected, "{net:?} cut at {cuts:?}");
    }
}

#[test]
fn fixtures_match_recorded_distance() {
    let expected_re = Regex::new(r"(?m)^#\s*traversed distance:\s*(\d+)\s*$").unwrap();
    let solver = PostmanSolver::new(BackendChoice::default());

    let mut checked = 0;
    for path in glob("instances/tiny/*.edges").unwrap().flatten() {
        let text = fs::read_to_string(&path).unwrap();
        let Some(caps) = expected_re.captures(&text) else {
            continue;
        };
        let expected: Weight = caps[1].parse().unwrap();

        let net = RouteNetwork::try_read_edge_list(text.as_bytes()).unwrap();
        let solution = solver.solve(&net).unwrap();
        assert_eq!(solution.traversed_distance(), expected, "{}", path.display());
        assert_eq!(
            BorderSolver::new(NaiveMatching)
                .solve(&net, &RouteNetwork::new())
                .unwrap()
                .traversed_distance(),
            expected
        );
        checked += 1;
    }

    assert!(checked > 0);
}

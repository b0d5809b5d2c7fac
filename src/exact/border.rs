//! Chinese postman over a network that is partitioned along a small set of cut edges.
//!
//! Every cut edge is traversed either once or twice. Each choice shifts the parity of the
//! edge's endpoints, so the reconciler precomputes for every component the matching for
//! every parity mask of its border vertices and then tries all assignments of the cut
//! edges.
//!
//! # Scaling
//! A component with `b` border vertices needs `2^b` matchings, and `k` cut edges lead to
//! `2^k` global assignments. Keep the cut set small.

use std::time::{Duration, Instant};

use fxhash::{FxHashMap, FxHashSet};
use itertools::Itertools;
use log::{debug, info, warn};
use num::{BigUint, One, ToPrimitive, Zero};
use serde::Serialize;

#[cfg(feature = "par")]
use rayon::prelude::*;

use super::*;
use crate::{
    errors::PostmanError,
    utils::{MaskedSequence, signal_handling},
};

/// A removed cut edge; endpoints refer to the working network
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct VirtualEdge {
    u: Node,
    v: Node,
    weight: Weight,
}

/// Matchings of one component for all parity masks of its border vertices
struct ComponentCache {
    border: BorderVertices,
    results: FxHashMap<BigUint, Vec<SubRoute>>,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct BorderSolution {
    pub base_distance: Weight,
    /// Bridges that are not cut edges; each is traversed twice
    pub bridges: Vec<SubRoute>,
    /// Cut edges traversed twice in the best assignment
    pub doubled_cut_edges: Vec<SubRoute>,
    /// Doubled stretches per component in the best assignment
    pub component_doubled_edges: Vec<Vec<SubRoute>>,
    /// False if the enumeration was interrupted and the result is only the best so far
    pub complete: bool,
}

impl BorderSolution {
    pub fn bridge_distance(&self) -> Weight {
        total_weight(&self.bridges)
    }

    pub fn cut_distance(&self) -> Weight {
        total_weight(&self.doubled_cut_edges)
    }

    pub fn matched_distance(&self) -> Weight {
        self.component_doubled_edges.iter().map(total_weight).sum()
    }

    pub fn duplicated_distance(&self) -> Weight {
        self.bridge_distance() + self.cut_distance() + self.matched_distance()
    }

    pub fn traversed_distance(&self) -> Weight {
        self.base_distance + self.duplicated_distance()
    }
}

pub struct BorderSolver<B> {
    backend: B,
    timeout: Option<Duration>,
}

struct Candidate {
    cost: Weight,
    cut_mask: BigUint,
    local_masks: Vec<BigUint>,
}

impl<B: MatchingBackend> BorderSolver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            timeout: None,
        }
    }

    /// Stops the search after `timeout`. Applies to building the component caches as well
    /// as to the enumeration of cut edge assignments.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Solves `network` where the edges of `cuts` (matched by weight and unordered pair of
    /// vertex names) separate the parts.
    pub fn solve(
        &self,
        network: &RouteNetwork,
        cuts: &RouteNetwork,
    ) -> Result<BorderSolution, PostmanError> {
        let start = Instant::now();
        let mut solution = BorderSolution {
            base_distance: network.total_distance(),
            ..Default::default()
        };

        let mut working = network.clone();
        let cut_ids = find_cut_edges(&working, cuts)?;

        let is_cut: FxHashSet<EdgeId> = cut_ids.iter().copied().collect();
        for e in working.compute_bridges() {
            if is_cut.contains(&e) {
                continue;
            }
            if let Some(edge) = working.remove_edge(e) {
                solution.bridges.push(SubRoute::from_edge(network, &edge));
            }
        }

        let mut virtual_edges = cut_ids
            .iter()
            .filter_map(|&e| working.remove_edge(e))
            .map(|WeightedEdge(u, v, weight)| VirtualEdge { u, v, weight })
            .collect_vec();
        virtual_edges.sort();

        let border_nodes: FxHashSet<Node> =
            virtual_edges.iter().flat_map(|e| [e.u, e.v]).collect();
        working.remove_trivial_vertices_except(|u| border_nodes.contains(&u));

        let split = working.split_into_components();
        info!(
            "{} cut edges, {} bridges, {} components",
            virtual_edges.len(),
            solution.bridges.len(),
            split.number_of_components()
        );

        let borders = component_borders(&split, &virtual_edges);
        let caches = self.build_caches(&split, borders, start)?;

        let (best, complete) = self.enumerate_cut_assignments(&split, &caches, &virtual_edges, start);
        solution.complete = complete;

        let Some(best) = best else {
            return Err(if complete {
                PostmanError::NoFeasibleConfiguration
            } else {
                PostmanError::Interrupted
            });
        };

        solution.doubled_cut_edges = virtual_edges
            .iter()
            .enumerate()
            .filter(|(i, _)| best.cut_mask.bit(*i as u64))
            .map(|(_, e)| SubRoute::new(working.name_of(e.u), working.name_of(e.v), e.weight))
            .collect();

        solution.component_doubled_edges = caches
            .iter()
            .zip(&best.local_masks)
            .map(|(cache, mask)| cache.results.get(mask).cloned().unwrap_or_default())
            .collect();

        debug_assert_eq!(best.cost, solution.cut_distance() + solution.matched_distance());
        Ok(solution)
    }

    fn build_caches(
        &self,
        split: &ComponentSplit,
        borders: Vec<BorderVertices>,
        start: Instant,
    ) -> Result<Vec<ComponentCache>, PostmanError> {
        let work = split.components.iter().zip(borders).enumerate();

        #[cfg(feature = "par")]
        let caches = work
            .collect_vec()
            .into_par_iter()
            .map(|(i, (component, border))| self.build_cache(i, component, border, start))
            .collect();

        #[cfg(not(feature = "par"))]
        let caches = work
            .map(|(i, (component, border))| self.build_cache(i, component, border, start))
            .collect();

        caches
    }

    fn build_cache(
        &self,
        index: usize,
        component: &RouteNetwork,
        mut border: BorderVertices,
        start: Instant,
    ) -> Result<ComponentCache, PostmanError> {
        let distances = component.all_pairs_shortest_paths();
        let mut results = FxHashMap::default();

        border.nodes.clear_mask();
        loop {
            border.nodes.increment();

            if let MatchingOutcome::Matched(routes) =
                find_doubled_edges(component, &distances, Some(&border), &self.backend)?
            {
                results.insert(border.nodes.mask().clone(), routes);
            }

            if border.nodes.is_empty_mask() {
                break;
            }

            if let Some(reason) = self.stop_reason(start) {
                warn!("{reason} while building the cache of component {index}");
                return Err(PostmanError::Interrupted);
            }
        }

        debug!(
            "Component {index}: {} nodes, {} border vertices, {} viable masks",
            component.number_of_nodes(),
            border.len(),
            results.len()
        );

        Ok(ComponentCache { border, results })
    }

    fn enumerate_cut_assignments(
        &self,
        split: &ComponentSplit,
        caches: &[ComponentCache],
        virtual_edges: &[VirtualEdge],
        start: Instant,
    ) -> (Option<Candidate>, bool) {
        // (component, position within the component's border) of both endpoints
        let endpoints = virtual_edges
            .iter()
            .map(|e| [border_position(split, caches, e.u), border_position(split, caches, e.v)])
            .collect_vec();

        let mut cut_mask = MaskedSequence::new(virtual_edges.to_vec());
        let total = BigUint::one() << virtual_edges.len();
        let mut visited = BigUint::zero();
        let mut last_decile = 0;

        let mut best: Option<Candidate> = None;
        let mut local_masks = vec![BigUint::zero(); caches.len()];

        loop {
            cut_mask.increment();
            visited += 1u32;

            local_masks.iter_mut().for_each(|m| m.set_zero());
            let mut cost = 0;
            for (i, edge) in cut_mask.iter().enumerate() {
                if !cut_mask.has(i) {
                    continue;
                }
                cost += edge.weight;
                for &(c, pos) in endpoints[i].iter().flatten() {
                    let bit = !local_masks[c].bit(pos as u64);
                    local_masks[c].set_bit(pos as u64, bit);
                }
            }

            let matched: Option<Weight> = caches
                .iter()
                .zip(&local_masks)
                .map(|(cache, mask)| cache.results.get(mask).map(total_weight))
                .sum();

            if let Some(matched) = matched {
                let cost = cost + matched;
                if best.as_ref().is_none_or(|b| cost < b.cost) {
                    debug!("New best assignment {:?} of cost {cost}", cut_mask.mask());
                    best = Some(Candidate {
                        cost,
                        cut_mask: cut_mask.mask().clone(),
                        local_masks: local_masks.clone(),
                    });
                }
            }

            if cut_mask.is_empty_mask() {
                return (best, true);
            }

            let decile = (&visited * 10u32 / &total).to_u32().unwrap_or(10);
            if decile > last_decile {
                last_decile = decile;
                info!("Enumerated {}0% of cut edge assignments", decile);
            }

            if let Some(reason) = self.stop_reason(start) {
                warn!("{reason}; reporting best assignment found so far");
                return (best, false);
            }
        }
    }

    fn stop_reason(&self, start: Instant) -> Option<&'static str> {
        if signal_handling::received_ctrl_c() {
            Some("Interrupted")
        } else if self.timeout.is_some_and(|t| start.elapsed() >= t) {
            Some("Timeout reached")
        } else {
            None
        }
    }
}

/// Finds one distinct edge of `network` for every edge of `cuts`
fn find_cut_edges(network: &RouteNetwork, cuts: &RouteNetwork) -> Result<Vec<EdgeId>, PostmanError> {
    let mut used = FxHashSet::default();
    let mut result = Vec::with_capacity(cuts.number_of_edges() as usize);

    for (_, cut) in cuts.edges() {
        let (a, b) = cuts.names_of_edge(&cut);
        let not_found = || PostmanError::CutEdgeNotFound {
            u: a.to_owned(),
            v: b.to_owned(),
            weight: cut.weight(),
        };

        let (Some(u), Some(v)) = (network.find_vertex(a), network.find_vertex(b)) else {
            return Err(not_found());
        };

        let e = network
            .incident_edges_of(u)
            .iter()
            .copied()
            .find(|&e| {
                !used.contains(&e)
                    && network.weight_of(e) == cut.weight()
                    && network.other_endpoint(e, u) == Some(v)
            })
            .ok_or_else(not_found)?;

        used.insert(e);
        result.push(e);
    }

    Ok(result)
}

/// Collects the border vertices of every component, ordered by their id in the
/// working network
fn component_borders(split: &ComponentSplit, virtual_edges: &[VirtualEdge]) -> Vec<BorderVertices> {
    let mut cut_degree: FxHashMap<Node, NumNodes> = FxHashMap::default();
    for e in virtual_edges {
        *cut_degree.entry(e.u).or_default() += 1;
        *cut_degree.entry(e.v).or_default() += 1;
    }

    let mut per_component = vec![Vec::new(); split.number_of_components()];
    for (&u, &deg) in cut_degree.iter().sorted_by_key(|&(&u, _)| u) {
        if let Some((c, local)) = split.new_id_of(u) {
            per_component[c as usize].push((local, deg));
        }
    }

    per_component
        .into_iter()
        .map(|border| {
            let (nodes, degrees) = border.into_iter().unzip();
            BorderVertices::new(nodes, degrees)
        })
        .collect()
}

fn border_position(
    split: &ComponentSplit,
    caches: &[ComponentCache],
    u: Node,
) -> Option<(usize, usize)> {
    let (c, local) = split.new_id_of(u)?;
    let pos = caches[c as usize].border.nodes.index(&local)?;
    Some((c as usize, pos))
}

#[cfg(test)]
mod test {
    use super::*;

    fn network(edges: &[(&str, &str, Weight)]) -> RouteNetwork {
        let mut net = RouteNetwork::new();
        for &(u, v, w) in edges {
            net.add_named_edge(u, v, w);
        }
        net
    }

    const TWO_SQUARES: [(&str, &str, Weight); 9] = [
        ("A", "B", 1),
        ("B", "C", 1),
        ("C", "D", 1),
        ("D", "A", 1),
        ("E", "F", 2),
        ("F", "G", 2),
        ("G", "H", 2),
        ("H", "E", 2),
        ("C", "E", 3),
    ];

    #[test]
    fn empty_cut_set_matches_plain_solver() {
        let net = network(&TWO_SQUARES);
        let plain = PostmanSolver::new(NaiveMatching).solve(&net).unwrap();
        let border = BorderSolver::new(NaiveMatching)
            .solve(&net, &RouteNetwork::new())
            .unwrap();

        assert!(border.complete);
        assert!(border.doubled_cut_edges.is_empty());
        assert_eq!(border.traversed_distance(), plain.traversed_distance());
    }

    #[test]
    fn two_cut_edges_between_halves() {
        // two squares joined by two parallel links: each link once, or both twice
        let mut net = network(&TWO_SQUARES);
        net.add_named_edge("B", "F", 3);
        let cuts = network(&[("E", "C", 3), ("B", "F", 3)]);

        let plain = PostmanSolver::new(NaiveMatching).solve(&net).unwrap();
        let sol = BorderSolver::new(NaiveMatching).solve(&net, &cuts).unwrap();

        assert!(sol.complete);
        assert!(sol.bridges.is_empty());
        assert_eq!(sol.traversed_distance(), plain.traversed_distance());
        assert_eq!(sol.component_doubled_edges.len(), 2);
    }

    #[test]
    fn cut_bridge_is_doubled() {
        let net = network(&TWO_SQUARES);
        let cuts = network(&[("E", "C", 3)]);
        let sol = BorderSolver::new(BackendChoice::default())
            .solve(&net, &cuts)
            .unwrap();

        assert_eq!(sol.doubled_cut_edges, vec![SubRoute::new("C", "E", 3)]);
        assert_eq!(sol.matched_distance(), 0);
        assert_eq!(sol.traversed_distance(), 12 + 3 + 3);
    }

    #[test]
    fn zero_timeout_is_interrupted() {
        let mut net = network(&TWO_SQUARES);
        net.add_named_edge("B", "F", 3);
        let cuts = network(&[("C", "E", 3), ("B", "F", 3)]);

        let result = BorderSolver::new(NaiveMatching)
            .with_timeout(Some(Duration::ZERO))
            .solve(&net, &cuts);
        assert!(matches!(result, Err(PostmanError::Interrupted)));
    }

    #[test]
    fn failed_matchings_leave_no_feasible_assignment() {
        // A and C stay odd in the left component for either parity of C
        let net = network(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "D", 1),
            ("D", "A", 1),
            ("A", "C", 5),
            ("C", "E", 3),
            ("E", "F", 1),
            ("F", "G", 1),
            ("G", "E", 1),
        ]);
        let cuts = network(&[("C", "E", 3)]);

        assert!(matches!(
            BorderSolver::new(FailingMatching).solve(&net, &cuts),
            Err(PostmanError::NoFeasibleConfiguration)
        ));

        // the same network is solvable with a working backend
        let sol = BorderSolver::new(NaiveMatching).solve(&net, &cuts).unwrap();
        assert!(sol.complete);
    }

    #[test]
    fn unknown_cut_edge() {
        let net = network(&TWO_SQUARES);
        for cut in [("C", "E", 4), ("C", "X", 3), ("A", "C", 1)] {
            let cuts = network(&[cut]);
            assert!(matches!(
                BorderSolver::new(NaiveMatching).solve(&net, &cuts),
                Err(PostmanError::CutEdgeNotFound { .. })
            ));
        }
    }

    #[test]
    fn duplicate_cut_edges_need_parallel_edges() {
        let net = network(&TWO_SQUARES);
        let cuts = network(&[("C", "E", 3), ("E", "C", 3)]);
        assert!(matches!(
            BorderSolver::new(NaiveMatching).solve(&net, &cuts),
            Err(PostmanError::CutEdgeNotFound { .. })
        ));
    }
}

use log::{debug, info, warn};
use serde::Serialize;

use super::*;
use crate::errors::PostmanError;

/// Result of the Chinese postman pipeline on a single network
#[derive(Clone, Debug, Default, Serialize)]
pub struct PostmanSolution {
    /// Sum of all edge weights of the input network
    pub base_distance: Weight,
    /// Bridges of the input; each is traversed twice
    pub bridges: Vec<SubRoute>,
    /// Shortest paths between matched odd vertices; each is traversed twice
    pub doubled_edges: Vec<SubRoute>,
    /// Number of components whose matching could not be solved
    pub skipped_components: usize,
}

impl PostmanSolution {
    pub fn bridge_distance(&self) -> Weight {
        total_weight(&self.bridges)
    }

    pub fn matched_distance(&self) -> Weight {
        total_weight(&self.doubled_edges)
    }

    /// Length of all stretches traversed a second time
    pub fn duplicated_distance(&self) -> Weight {
        self.bridge_distance() + self.matched_distance()
    }

    /// Length of the closed route covering every edge
    pub fn traversed_distance(&self) -> Weight {
        self.base_distance + self.duplicated_distance()
    }
}

/// Runs bridge removal, degree-2 contraction, component splitting, shortest paths and
/// matching in that order.
pub struct PostmanSolver<B> {
    backend: B,
}

impl<B: MatchingBackend> PostmanSolver<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn solve(&self, network: &RouteNetwork) -> Result<PostmanSolution, PostmanError> {
        let mut solution = PostmanSolution {
            base_distance: network.total_distance(),
            ..Default::default()
        };

        let mut working = network.clone();

        let bridges = working.compute_bridges();
        info!("Found {} bridges", bridges.len());
        for e in bridges {
            if let Some(edge) = working.remove_edge(e) {
                solution.bridges.push(SubRoute::from_edge(network, &edge));
            }
        }

        let contracted = working.remove_trivial_vertices();
        debug!("Contracted {contracted} vertices of degree 2");

        let split = working.split_into_components();
        info!(
            "Solving {} components with {} nodes and {} edges",
            split.number_of_components(),
            working.number_of_nodes(),
            working.number_of_edges()
        );

        for (i, component) in split.iter().enumerate() {
            if component.number_of_edges() == 0 {
                continue;
            }

            let distances = component.all_pairs_shortest_paths();
            match find_doubled_edges(component, &distances, None, &self.backend)? {
                MatchingOutcome::Matched(routes) => {
                    debug!(
                        "Component {i} ({} nodes): {} doubled stretches of length {}",
                        component.number_of_nodes(),
                        routes.len(),
                        total_weight(&routes)
                    );
                    solution.doubled_edges.extend(routes);
                }
                MatchingOutcome::NotViable(reason) => {
                    warn!("Skipping component {i}: {reason}");
                    solution.skipped_components += 1;
                }
            }
        }

        Ok(solution)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn solve(edges: &[(&str, &str, Weight)]) -> PostmanSolution {
        let mut net = RouteNetwork::new();
        for &(u, v, w) in edges {
            net.add_named_edge(u, v, w);
        }
        PostmanSolver::new(BackendChoice::default()).solve(&net).unwrap()
    }

    #[test]
    fn cycle_needs_no_duplication() {
        let sol = solve(&[("A", "B", 1), ("B", "C", 2), ("C", "A", 3)]);
        assert!(sol.bridges.is_empty());
        assert!(sol.doubled_edges.is_empty());
        assert_eq!(sol.duplicated_distance(), 0);
        assert_eq!(sol.traversed_distance(), 6);
    }

    #[test]
    fn path_doubles_both_bridges() {
        let sol = solve(&[("A", "B", 2), ("B", "C", 5)]);
        assert_eq!(
            sol.bridges,
            vec![SubRoute::new("A", "B", 2), SubRoute::new("B", "C", 5)]
        );
        assert!(sol.doubled_edges.is_empty());
        assert_eq!(sol.traversed_distance(), 14);
    }

    #[test]
    fn square_with_diagonal() {
        let sol = solve(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "D", 1),
            ("D", "A", 1),
            ("A", "C", 5),
        ]);
        assert!(sol.bridges.is_empty());
        assert_eq!(sol.doubled_edges.len(), 1);
        assert_eq!(sol.matched_distance(), 2);
        assert_eq!(sol.traversed_distance(), 11);
    }

    #[test]
    fn two_cycles_joined_by_bridge() {
        // the bridge C-D is doubled; all other degrees are even once it is removed
        let sol = solve(&[
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "A", 1),
            ("C", "D", 7),
            ("D", "E", 2),
            ("E", "F", 2),
            ("F", "D", 2),
        ]);
        assert_eq!(sol.bridges, vec![SubRoute::new("C", "D", 7)]);
        assert!(sol.doubled_edges.is_empty());
        assert_eq!(sol.traversed_distance(), 9 + 7 + 7);
    }

    #[test]
    fn failed_matching_skips_component() {
        let mut net = RouteNetwork::new();
        for (u, v, w) in [
            ("A", "B", 1),
            ("B", "C", 1),
            ("C", "D", 1),
            ("D", "A", 1),
            ("A", "C", 5),
            ("D", "E", 4),
            ("E", "F", 1),
            ("F", "G", 1),
            ("G", "E", 1),
        ] {
            net.add_named_edge(u, v, w);
        }

        let sol = PostmanSolver::new(FailingMatching).solve(&net).unwrap();
        assert_eq!(sol.skipped_components, 1);
        assert_eq!(sol.bridges, vec![SubRoute::new("D", "E", 4)]);
        assert!(sol.doubled_edges.is_empty());
        assert_eq!(sol.traversed_distance(), 16 + 4);
    }

    #[test]
    fn all_even_degrees_in_parallel_edges() {
        let sol = solve(&[("A", "B", 3), ("A", "B", 4)]);
        assert!(sol.bridges.is_empty());
        assert_eq!(sol.duplicated_distance(), 0);
        assert_eq!(sol.traversed_distance(), 7);
    }
}

use itertools::Itertools;
use log::{debug, trace};

use super::*;
use crate::{errors::PostmanError, utils::MaskedSequence};

/// Border vertices of one component, i.e. endpoints of removed cut edges, together with
/// the number of cut edge-ends at each of them. The mask of `nodes` marks the border
/// vertices whose parity is flipped by cut edges that are currently traversed twice.
#[derive(Clone, Debug, Default)]
pub struct BorderVertices {
    pub nodes: MaskedSequence<Node>,
    pub cut_degree: Vec<NumNodes>,
}

impl BorderVertices {
    pub fn new(nodes: Vec<Node>, cut_degree: Vec<NumNodes>) -> Self {
        debug_assert_eq!(nodes.len(), cut_degree.len());
        Self {
            nodes: MaskedSequence::new(nodes),
            cut_degree,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Contribution of the cut edges to the degree of `u`: each incident cut edge counts
    /// once, and the mask bit adds one more
    fn external_degree(&self, u: Node) -> NumNodes {
        self.nodes
            .index_with_bit(&u)
            .map_or(0, |(i, flipped)| self.cut_degree[i] + flipped as NumNodes)
    }
}

/// Returns the vertices of `component` whose degree, adjusted by the border state, is odd
pub fn odd_vertices(component: &RouteNetwork, border: Option<&BorderVertices>) -> Vec<Node> {
    component
        .vertices()
        .filter(|&u| {
            let external = border.map_or(0, |b| b.external_degree(u));
            (component.degree_of(u) + external) % 2 == 1
        })
        .collect_vec()
}

/// Determines the stretches of `component` that have to be traversed twice so that every
/// vertex gets even degree: the odd vertices are paired up at minimum total shortest-path
/// distance.
///
/// An odd number of odd vertices is only possible if border vertices shift the parity; in
/// this case the current mask is [`NotViable::OddParity`]. Without border vertices it
/// violates the handshake lemma and is reported as [`PostmanError::OddVertexCount`].
///
/// Shortest paths of two selected pairs may share edges, and no constraint prevents this
/// from counting such an edge twice. With positive weights a minimum matching never
/// produces overlapping paths, so the result is still optimal.
pub fn find_doubled_edges<B: MatchingBackend>(
    component: &RouteNetwork,
    distances: &DistanceMatrix,
    border: Option<&BorderVertices>,
    backend: &B,
) -> Result<MatchingOutcome, PostmanError> {
    let odd = odd_vertices(component, border);

    if odd.len() % 2 == 1 {
        if border.is_some_and(|b| !b.is_empty()) {
            trace!("Mask {:?} yields {} odd vertices", border.map(|b| b.nodes.mask()), odd.len());
            return Ok(MatchingOutcome::NotViable(NotViable::OddParity));
        }

        return Err(PostmanError::OddVertexCount {
            vertex: component.name_of(odd[0]).to_owned(),
            count: odd.len(),
        });
    }

    if odd.is_empty() {
        return Ok(MatchingOutcome::Matched(Vec::new()));
    }

    let pairs = match backend.min_weight_perfect_matching(&odd, distances) {
        Ok(pairs) => pairs,
        Err(reason) => {
            debug!("Matching of {} odd vertices not viable: {reason}", odd.len());
            return Ok(MatchingOutcome::NotViable(reason));
        }
    };

    let mut routes = Vec::with_capacity(pairs.len());
    for (i, j) in pairs {
        let (u, v) = (odd[i], odd[j]);
        let Some(weight) = distances.distance(u, v) else {
            return Ok(MatchingOutcome::NotViable(NotViable::Unreachable));
        };
        routes.push(SubRoute::new(component.name_of(u), component.name_of(v), weight));
    }

    Ok(MatchingOutcome::Matched(routes))
}

#[cfg(test)]
mod test {
    use super::*;

    fn star() -> RouteNetwork {
        // center X with leaves A, B, C plus a cycle X-D-E-X
        let mut net = RouteNetwork::new();
        for (u, v, w) in [("X", "A", 2), ("X", "B", 3), ("X", "C", 4), ("X", "D", 1), ("D", "E", 1), ("E", "X", 1)] {
            net.add_named_edge(u, v, w);
        }
        net
    }

    #[test]
    fn eulerian_component_needs_nothing() {
        let mut net = RouteNetwork::new();
        net.add_named_edge("A", "B", 1);
        net.add_named_edge("B", "C", 2);
        net.add_named_edge("C", "A", 3);
        let dist = net.all_pairs_shortest_paths();

        for backend in [BackendChoice::default(), "naive".parse().unwrap()] {
            assert_eq!(
                find_doubled_edges(&net, &dist, None, &backend).unwrap(),
                MatchingOutcome::Matched(vec![])
            );
        }
    }

    #[test]
    fn single_odd_pair_uses_shortest_distance() {
        let mut net = RouteNetwork::new();
        net.add_named_edge("A", "B", 4);
        net.add_named_edge("B", "C", 4);
        net.add_named_edge("A", "C", 10);
        net.add_named_edge("A", "D", 1);
        net.add_named_edge("C", "D", 2);
        let dist = net.all_pairs_shortest_paths();
        assert_eq!(odd_vertices(&net, None), vec![0, 2]);

        let outcome = find_doubled_edges(&net, &dist, None, &NaiveMatching).unwrap();
        assert_eq!(outcome, MatchingOutcome::Matched(vec![SubRoute::new("A", "C", 3)]));
    }

    #[test]
    fn border_parity_decides_viability() {
        let net = star();
        let dist = net.all_pairs_shortest_paths();
        let x = net.find_vertex("X").unwrap();
        let mut border = BorderVertices::new(vec![x], vec![1]);

        // X has degree 5, with one cut edge-end it is even; A, B, C remain odd
        let outcome = find_doubled_edges(&net, &dist, Some(&border), &NaiveMatching).unwrap();
        assert_eq!(outcome, MatchingOutcome::NotViable(NotViable::OddParity));

        // doubling the cut edge flips X back to odd
        border.nodes.flip(0);
        let MatchingOutcome::Matched(routes) =
            find_doubled_edges(&net, &dist, Some(&border), &NaiveMatching).unwrap()
        else {
            panic!("expected a matching");
        };
        assert_eq!(routes.len(), 2);
        assert_eq!(total_weight(&routes), 2 + 3 + 4);
    }
}

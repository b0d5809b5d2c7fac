use log::warn;

use super::*;

/// Exhaustive recursive pairing with simple bound pruning. Exact but exponential in the
/// number of odd vertices; meant for small instances and cross-checking.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NaiveMatching;

const WARN_ABOVE: usize = 16;

impl MatchingBackend for NaiveMatching {
    fn min_weight_perfect_matching(
        &self,
        odd: &[Node],
        distances: &DistanceMatrix,
    ) -> Result<Vec<(usize, usize)>, NotViable> {
        if odd.len() > WARN_ABOVE {
            warn!(
                "Naive matching over {} odd vertices; this may take very long",
                odd.len()
            );
        }

        let mut search = NaiveSearch {
            odd,
            distances,
            matched: vec![false; odd.len()],
            current: Vec::with_capacity(odd.len() / 2),
            best: None,
        };
        search.recurse(0);

        search.best.map(|(_, pairs)| pairs).ok_or(NotViable::Unreachable)
    }
}

struct NaiveSearch<'a> {
    odd: &'a [Node],
    distances: &'a DistanceMatrix,
    matched: Vec<bool>,
    current: Vec<(usize, usize)>,
    best: Option<(Weight, Vec<(usize, usize)>)>,
}

impl NaiveSearch<'_> {
    fn recurse(&mut self, cost: Weight) {
        if self.best.as_ref().is_some_and(|(b, _)| *b <= cost) {
            return;
        }

        let Some(i) = self.matched.iter().position(|m| !m) else {
            self.best = Some((cost, self.current.clone()));
            return;
        };

        self.matched[i] = true;
        for j in i + 1..self.odd.len() {
            if self.matched[j] {
                continue;
            }
            let Some(d) = self.distances.distance(self.odd[i], self.odd[j]) else {
                continue;
            };

            self.matched[j] = true;
            self.current.push((i, j));
            self.recurse(cost + d);
            self.current.pop();
            self.matched[j] = false;
        }
        self.matched[i] = false;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn picks_cheaper_pairing() {
        // path A -1- B -10- C -1- D: pairing (A,B),(C,D) costs 2, all others are worse
        let mut net = RouteNetwork::new();
        net.add_named_edge("A", "B", 1);
        net.add_named_edge("B", "C", 10);
        net.add_named_edge("C", "D", 1);

        let odd = ["A", "B", "C", "D"].map(|n| net.find_vertex(n).unwrap());
        let dist = net.all_pairs_shortest_paths();
        let pairs = NaiveMatching.min_weight_perfect_matching(&odd, &dist).unwrap();
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn no_perfect_matching() {
        let mut net = RouteNetwork::new();
        net.add_named_edge("A", "B", 1);
        net.add_vertex("C");
        net.add_vertex("D");
        let odd = ["A", "B", "C", "D"].map(|n| net.find_vertex(n).unwrap());
        let dist = net.all_pairs_shortest_paths();
        assert_eq!(
            NaiveMatching.min_weight_perfect_matching(&odd, &dist),
            Err(NotViable::Unreachable)
        );
    }
}

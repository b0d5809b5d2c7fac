use super::*;

const UNREACHABLE: Weight = Weight::MAX;

/// Shortest-path distances between all pairs of nodes of one graph.
///
/// The matrix is derived data: it has to be recomputed whenever the edge set of the
/// underlying graph changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceMatrix {
    n: usize,
    dist: Vec<Weight>,
}

pub trait AllPairsShortestPaths {
    fn all_pairs_shortest_paths(&self) -> DistanceMatrix;
}

impl<G: IncidenceList> AllPairsShortestPaths for G {
    fn all_pairs_shortest_paths(&self) -> DistanceMatrix {
        DistanceMatrix::floyd_warshall(self)
    }
}

impl DistanceMatrix {
    /// Floyd-Warshall in O(n^3). Parallel edges contribute their lightest member and
    /// self-loops are ignored; all weights are non-negative.
    pub fn floyd_warshall<G: IncidenceList>(graph: &G) -> Self {
        let n = graph.vertices_range().end as usize;
        let mut dist = vec![UNREACHABLE; n * n];

        for u in graph.vertices() {
            let u = u as usize;
            dist[u * n + u] = 0;
        }

        for u in graph.vertices() {
            for &e in graph.incident_edges_of(u) {
                let Some(v) = graph.other_endpoint(e, u) else {
                    continue;
                };
                let idx = u as usize * n + v as usize;
                dist[idx] = dist[idx].min(graph.weight_of(e));
            }
        }

        for k in 0..n {
            for i in 0..n {
                let d_ik = dist[i * n + k];
                if d_ik == UNREACHABLE {
                    continue;
                }

                for j in 0..n {
                    let d_kj = dist[k * n + j];
                    if d_kj == UNREACHABLE {
                        continue;
                    }

                    let candidate = d_ik.saturating_add(d_kj);
                    if candidate < dist[i * n + j] {
                        dist[i * n + j] = candidate;
                    }
                }
            }
        }

        Self { n, dist }
    }

    /// Returns the length of a shortest `u`-`v` path or `None` if `v` is unreachable
    pub fn distance(&self, u: Node, v: Node) -> Option<Weight> {
        let (u, v) = (u as usize, v as usize);
        if u >= self.n || v >= self.n {
            return None;
        }

        let d = self.dist[u * self.n + v];
        (d != UNREACHABLE).then_some(d)
    }

    /// Number of rows (and columns), including possibly deleted nodes
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn single_vertex() {
        let mut net = RouteNetwork::new();
        let a = net.add_vertex("A");
        let d = net.all_pairs_shortest_paths();
        assert_eq!(d.len(), 1);
        assert_eq!(d.distance(a, a), Some(0));
    }

    #[test]
    fn empty_graph() {
        let d = RouteNetwork::new().all_pairs_shortest_paths();
        assert!(d.is_empty());
        assert_eq!(d.distance(0, 0), None);
    }

    #[test]
    fn shortcut_via_two_hops() {
        let mut net = RouteNetwork::new();
        net.add_named_edge("A", "B", 10);
        net.add_named_edge("A", "C", 3);
        net.add_named_edge("C", "B", 4);
        net.add_named_edge("B", "D", 1);
        net.add_named_edge("B", "D", 7);
        net.add_named_edge("D", "D", 1);
        let x = net.add_vertex("X");

        let [a, b, c, d] = ["A", "B", "C", "D"].map(|n| net.find_vertex(n).unwrap());
        let dist = net.all_pairs_shortest_paths();

        assert_eq!(dist.distance(a, b), Some(7));
        assert_eq!(dist.distance(b, a), Some(7));
        assert_eq!(dist.distance(a, d), Some(8));
        assert_eq!(dist.distance(c, d), Some(5));
        assert_eq!(dist.distance(d, d), Some(0));
        assert_eq!(dist.distance(a, x), None);

        // symmetric and satisfies the triangle inequality
        for u in net.vertices() {
            for v in net.vertices() {
                assert_eq!(dist.distance(u, v), dist.distance(v, u));
                for w in net.vertices() {
                    if let (Some(uw), Some(wv), Some(uv)) =
                        (dist.distance(u, w), dist.distance(w, v), dist.distance(u, v))
                    {
                        assert!(uv <= uw + wv);
                    }
                }
            }
        }
    }
}

use itertools::Itertools;
use log::trace;

use super::*;

/// Contraction of degree-2 vertices: a vertex with exactly two incident edge-ends
/// `u -a- x -b- v` is replaced by a single edge `u -(a+b)- v`.
/// Shortest-path distances between the remaining vertices are unchanged.
pub trait Simplify {
    /// Contracts every degree-2 vertex. Returns the number of removed vertices.
    fn remove_trivial_vertices(&mut self) -> NumNodes {
        self.remove_trivial_vertices_except(|_| false)
    }

    /// Same as [`Simplify::remove_trivial_vertices`], but vertices for which `is_pinned`
    /// returns true are never contracted.
    fn remove_trivial_vertices_except(&mut self, is_pinned: impl Fn(Node) -> bool) -> NumNodes;
}

impl Simplify for RouteNetwork {
    fn remove_trivial_vertices_except(&mut self, is_pinned: impl Fn(Node) -> bool) -> NumNodes {
        let candidates = self
            .vertices()
            .filter(|&u| self.degree_of(u) == 2 && !is_pinned(u))
            .collect_vec();

        let mut removed = 0;
        for x in candidates {
            // an earlier contraction may have turned x's two edges into a loop,
            // which keeps the degree at 2
            let &[e0, e1] = self.incident_edges_of(x) else {
                continue;
            };
            if e0 == e1 {
                continue;
            }

            let (Some(first), Some(second)) = (self.remove_edge(e0), self.remove_edge(e1)) else {
                continue;
            };

            let u = first.opposite_of(x).unwrap_or(x);
            let v = second.opposite_of(x).unwrap_or(x);
            self.add_edge(u, v, first.weight() + second.weight());
            self.remove_vertex(x);
            removed += 1;
        }

        trace!("Contracted {removed} degree-2 vertices");
        removed
    }
}

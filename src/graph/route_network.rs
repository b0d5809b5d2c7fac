use std::fmt;

use fxhash::FxHashMap;
use smallvec::SmallVec;

use super::*;
use crate::errors::{InvariantCheck, NetworkInvariantError};

type Incidence = SmallVec<[EdgeId; 4]>;

/// Weighted undirected multigraph with named vertices.
///
/// Node and edge ids are stable: removing a vertex or an edge leaves a tombstone behind,
/// so ids handed out earlier never get reassigned. Parallel edges are kept as separate
/// edges and self-loops are tolerated.
#[derive(Clone, Default)]
pub struct RouteNetwork {
    names: Vec<Option<String>>,
    name_index: FxHashMap<String, Node>,
    edges: Vec<Option<WeightedEdge>>,
    incidence: Vec<Incidence>,
    number_of_nodes: NumNodes,
    number_of_edges: NumEdges,
}

impl RouteNetwork {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the node called `name`; creates it if it does not exist yet.
    ///
    /// # Example
    /// ```
    /// use postman::graph::*;
    /// let mut net = RouteNetwork::new();
    /// let a = net.add_vertex("A");
    /// assert_eq!(net.add_vertex("A"), a);
    /// assert_eq!(net.number_of_nodes(), 1);
    /// ```
    pub fn add_vertex(&mut self, name: &str) -> Node {
        if let Some(&u) = self.name_index.get(name) {
            return u;
        }

        let u = self.names.len() as Node;
        self.names.push(Some(name.to_owned()));
        self.incidence.push(Default::default());
        self.name_index.insert(name.to_owned(), u);
        self.number_of_nodes += 1;
        u
    }

    pub fn find_vertex(&self, name: &str) -> Option<Node> {
        self.name_index.get(name).copied()
    }

    pub fn contains_vertex(&self, u: Node) -> bool {
        self.names.get(u as usize).is_some_and(|n| n.is_some())
    }

    /// Returns the name of `u` or `None` if the node was removed
    pub fn try_name_of(&self, u: Node) -> Option<&str> {
        self.names.get(u as usize)?.as_deref()
    }

    /// Returns the name of `u`.
    /// ** Panics if `u` does not exist or was removed **
    pub fn name_of(&self, u: Node) -> &str {
        match self.try_name_of(u) {
            Some(name) => name,
            None => panic!("node {u} is not part of the network"),
        }
    }

    /// Adds the undirected edge `{u, v}` and returns its id; parallel edges are never merged.
    /// ** Panics if `u` or `v` do not exist **
    pub fn add_edge(&mut self, u: Node, v: Node, weight: Weight) -> EdgeId {
        assert!(self.contains_vertex(u) && self.contains_vertex(v));
        debug_assert!(weight > 0);

        let e = self.edges.len() as EdgeId;
        self.edges.push(Some(WeightedEdge(u, v, weight)));
        self.incidence[u as usize].push(e);
        self.incidence[v as usize].push(e);
        self.number_of_edges += 1;
        e
    }

    /// Adds an edge between the vertices called `u` and `v`, creating them on first mention
    pub fn add_named_edge(&mut self, u: &str, v: &str, weight: Weight) -> EdgeId {
        let u = self.add_vertex(u);
        let v = self.add_vertex(v);
        self.add_edge(u, v, weight)
    }

    /// Removes edge `e` and returns it, or `None` if it did not exist
    pub fn remove_edge(&mut self, e: EdgeId) -> Option<WeightedEdge> {
        let edge = self.edges.get_mut(e as usize)?.take()?;

        self.incidence[edge.0 as usize].retain(|f| *f != e);
        if !edge.is_loop() {
            self.incidence[edge.1 as usize].retain(|f| *f != e);
        }

        self.number_of_edges -= 1;
        Some(edge)
    }

    /// Removes `u` together with all edges incident to it.
    /// Returns `false` if the node did not exist.
    pub fn remove_vertex(&mut self, u: Node) -> bool {
        let Some(name) = self.names.get_mut(u as usize).and_then(|n| n.take()) else {
            return false;
        };

        for e in std::mem::take(&mut self.incidence[u as usize]) {
            if let Some(edge) = self.edges[e as usize].take() {
                self.number_of_edges -= 1;
                if let Some(v) = edge.opposite_of(u).filter(|&v| v != u) {
                    self.incidence[v as usize].retain(|f| *f != e);
                }
            }
        }

        self.name_index.remove(&name);
        self.number_of_nodes -= 1;
        true
    }

    pub fn edge(&self, e: EdgeId) -> Option<WeightedEdge> {
        self.edges.get(e as usize).copied().flatten()
    }

    /// Returns an iterator over all (non-deleted) edges in order of their ids
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, WeightedEdge)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(e, edge)| Some((e as EdgeId, (*edge)?)))
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges().map(|(e, _)| e)
    }

    /// Sum of all edge weights
    /// Sum of all edge weights; saturates at `Weight::MAX`
    pub fn total_distance(&self) -> Weight {
        self.edges()
            .fold(0, |total: Weight, (_, edge)| total.saturating_add(edge.weight()))
    }

    /// Returns the names of both endpoints of `edge`
    pub fn names_of_edge(&self, edge: &WeightedEdge) -> (&str, &str) {
        (self.name_of(edge.0), self.name_of(edge.1))
    }

    /// Returns the first node in id order (the one that was mentioned first), if any
    pub fn first_vertex(&self) -> Option<Node> {
        self.vertices().next()
    }
}

impl GraphNodeOrder for RouteNetwork {
    fn number_of_nodes(&self) -> NumNodes {
        self.number_of_nodes
    }

    fn vertices(&self) -> impl Iterator<Item = Node> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(u, name)| name.as_ref().map(|_| u as Node))
    }

    fn vertices_range(&self) -> Range<Node> {
        0..self.names.len() as Node
    }
}

impl GraphEdgeOrder for RouteNetwork {
    fn number_of_edges(&self) -> NumEdges {
        self.number_of_edges
    }
}

impl IncidenceList for RouteNetwork {
    fn incident_edges_of(&self, u: Node) -> &[EdgeId] {
        &self.incidence[u as usize]
    }

    fn other_endpoint(&self, e: EdgeId, u: Node) -> Option<Node> {
        self.edge(e)?.opposite_of(u)
    }

    fn weight_of(&self, e: EdgeId) -> Weight {
        match self.edge(e) {
            Some(edge) => edge.weight(),
            None => panic!("edge {e} is not part of the network"),
        }
    }
}

impl InvariantCheck<NetworkInvariantError> for RouteNetwork {
    fn is_correct(&self) -> Result<(), NetworkInvariantError> {
        for (e, edge) in self.edges() {
            if !self.contains_vertex(edge.0) || !self.contains_vertex(edge.1) {
                return Err(NetworkInvariantError::DanglingEdge(e));
            }

            let ends_at = |u: Node| self.incidence[u as usize].iter().filter(|&&f| f == e).count();
            let expected = if edge.is_loop() { 2 } else { 1 };
            if ends_at(edge.0) != expected || ends_at(edge.1) != expected {
                return Err(NetworkInvariantError::InconsistentIncidence(edge.0));
            }
        }

        for u in self.vertices() {
            if self.incident_edges_of(u).iter().any(|&e| self.edge(e).is_none()) {
                return Err(NetworkInvariantError::InconsistentIncidence(u));
            }

            let name = self.name_of(u);
            if self.name_index.get(name) != Some(&u) {
                return Err(NetworkInvariantError::DuplicateName(name.to_owned()));
            }
        }

        if self.name_index.len() != self.number_of_nodes as usize {
            return Err(NetworkInvariantError::NodeCountMismatch);
        }

        Ok(())
    }
}

impl fmt::Debug for RouteNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let edges: Vec<_> = self
            .edges()
            .map(|(_, edge)| {
                let (a, b) = self.names_of_edge(&edge);
                format!("{a}-{b}:{}", edge.weight())
            })
            .collect();
        write!(
            f,
            "RouteNetwork {{ n: {}, m: {}, edges: [{}] }}",
            self.number_of_nodes,
            self.number_of_edges,
            edges.join(", ")
        )
    }
}

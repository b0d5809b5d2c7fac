pub mod bridges;
pub mod connectivity;
pub mod edge;
pub mod gnp;
pub mod route_network;
pub mod shortest_paths;
pub mod simplify;

pub type Node = u32;
pub type NumNodes = Node;
pub type EdgeId = u32;
pub type NumEdges = EdgeId;
pub type Weight = u64;

use std::ops::Range;

pub use bridges::*;
pub use connectivity::*;
pub use edge::*;
pub use gnp::*;
pub use route_network::*;
pub use shortest_paths::*;
pub use simplify::*;

/// Provides getters pertaining to the size of a graph
pub trait GraphNodeOrder {
    /// Returns the number of (non-deleted) nodes of the graph
    fn number_of_nodes(&self) -> NumNodes;

    /// Returns an iterator over all non-deleted nodes in increasing order
    fn vertices(&self) -> impl Iterator<Item = Node> + '_;

    /// Returns a range of vertices possibly including deleted vertices
    /// In contrast to self.vertices(), the range returned by self.vertices_range() does
    /// not borrow self and hence may be used where additional mutable references of self are needed
    ///
    /// # Warning
    /// This method may iterate over deleted vertices. It is the responsibility of the caller
    /// to identify and treat them accordingly.
    fn vertices_range(&self) -> Range<Node>;

    /// Returns true if the graph has no nodes (and thus no edges)
    fn is_empty(&self) -> bool {
        self.number_of_nodes() == 0
    }
}

pub trait GraphEdgeOrder {
    /// Returns the number of (non-deleted) edges of the graph
    fn number_of_edges(&self) -> NumEdges;
}

/// Undirected multigraph where every node knows the ids of its incident edges.
/// A self-loop is listed twice at its node, so it contributes 2 to the degree.
pub trait IncidenceList: GraphNodeOrder {
    /// Returns the ids of all edges incident to `u`.
    /// ** Panics if `u` is out of range **
    fn incident_edges_of(&self, u: Node) -> &[EdgeId];

    /// Returns the endpoint of edge `e` opposite to `u`, or `None` if `e` does not
    /// exist or `u` is not one of its endpoints.
    fn other_endpoint(&self, e: EdgeId, u: Node) -> Option<Node>;

    /// Returns the weight of edge `e`.
    /// ** Panics if the edge does not exist **
    fn weight_of(&self, e: EdgeId) -> Weight;

    /// Returns the number of edge-ends at `u`
    fn degree_of(&self, u: Node) -> NumNodes {
        self.incident_edges_of(u).len() as NumNodes
    }

    fn degrees(&self) -> impl Iterator<Item = NumNodes> + '_ {
        self.vertices().map(|u| self.degree_of(u))
    }
}

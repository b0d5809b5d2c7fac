use serde::Serialize;

use super::*;

pub trait EdgeOps {
    fn normalized(&self) -> Self;
    fn is_normalized(&self) -> bool;
    fn is_loop(&self) -> bool;
    fn reverse(&self) -> Self;
}

/// Undirected edge `(u, v)` carrying a positive distance
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize)]
pub struct WeightedEdge(pub Node, pub Node, pub Weight);

impl WeightedEdge {
    pub fn weight(&self) -> Weight {
        self.2
    }

    pub fn endpoints(&self) -> (Node, Node) {
        (self.0, self.1)
    }

    /// Returns the endpoint opposite to `u` or `None` if `u` is not incident
    pub fn opposite_of(&self, u: Node) -> Option<Node> {
        if u == self.0 {
            Some(self.1)
        } else if u == self.1 {
            Some(self.0)
        } else {
            None
        }
    }

    pub fn is_incident_to(&self, u: Node) -> bool {
        self.0 == u || self.1 == u
    }
}

impl EdgeOps for WeightedEdge {
    fn normalized(&self) -> Self {
        WeightedEdge(self.0.min(self.1), self.0.max(self.1), self.2)
    }

    fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    fn reverse(&self) -> Self {
        WeightedEdge(self.1, self.0, self.2)
    }
}

impl From<(Node, Node, Weight)> for WeightedEdge {
    fn from(value: (Node, Node, Weight)) -> Self {
        WeightedEdge(value.0, value.1, value.2)
    }
}

impl From<&(Node, Node, Weight)> for WeightedEdge {
    fn from(value: &(Node, Node, Weight)) -> Self {
        WeightedEdge(value.0, value.1, value.2)
    }
}

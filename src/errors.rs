use std::error::Error;

use thiserror::Error;

use crate::graph::{EdgeId, Node, Weight};

/// Trait for checking invariants in datastructures
pub trait InvariantCheck<E: Error> {
    fn is_correct(&self) -> Result<(), E>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetworkInvariantError {
    #[error("edge {0} references a deleted or unknown vertex")]
    DanglingEdge(EdgeId),

    #[error("incidence list of vertex {0} disagrees with the edge list")]
    InconsistentIncidence(Node),

    #[error("vertex name {0:?} is not indexed consistently")]
    DuplicateName(String),

    #[error("cached node or edge count does not match the stored data")]
    NodeCountMismatch,
}

/// Errors while parsing an edge list
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected a positive integer distance")]
    InvalidDistance { line: usize },

    #[error("line {line}: expected two vertex names after the distance")]
    MissingVertexName { line: usize },

    #[error("line {line}: total distance exceeds the supported range")]
    DistanceOverflow { line: usize },

    #[error("the edge list contains no edge with positive distance")]
    Empty,
}

#[derive(Debug, Error)]
pub enum PostmanError {
    #[error(transparent)]
    Read(#[from] ReadError),

    #[error("cut edge {u} - {v} (distance {weight}) does not exist in the network")]
    CutEdgeNotFound { u: String, v: String, weight: Weight },

    #[error("component contains an odd number ({count}) of odd-degree vertices, first is {vertex}")]
    OddVertexCount { vertex: String, count: usize },

    #[error("no assignment of the cut edges admits a closed route")]
    NoFeasibleConfiguration,

    #[error("search was interrupted before any feasible assignment was found")]
    Interrupted,
}

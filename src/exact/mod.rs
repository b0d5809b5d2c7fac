pub mod border;
pub mod highs;
pub mod matching;
pub mod naive;
pub mod solver;

use std::{str::FromStr, time::Duration};

use serde::Serialize;
use thiserror::Error;

use crate::graph::*;

pub use border::*;
pub use self::highs::HighsMatching;
pub use matching::*;
pub use self::naive::NaiveMatching;
pub use solver::*;

/// A stretch of the network that is traversed one additional time. For bridges and doubled
/// cut edges this is a single physical edge; for matched pairs it is a shortest path between
/// the two vertices whose length is `weight`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SubRoute {
    pub from: String,
    pub to: String,
    pub weight: Weight,
}

impl SubRoute {
    pub fn new(from: &str, to: &str, weight: Weight) -> Self {
        Self {
            from: from.to_owned(),
            to: to.to_owned(),
            weight,
        }
    }

    pub fn from_edge(network: &RouteNetwork, edge: &WeightedEdge) -> Self {
        let (from, to) = network.names_of_edge(edge);
        Self::new(from, to, edge.weight())
    }
}

pub fn total_weight<'a>(routes: impl IntoIterator<Item = &'a SubRoute>) -> Weight {
    routes.into_iter().map(|r| r.weight).sum()
}

/// Reasons why a single matching instance has no solution. None of these abort a run;
/// the configuration that produced it is skipped.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum NotViable {
    #[error("odd number of odd-degree vertices under the current border parity")]
    OddParity,

    #[error("matching solver failed: {0}")]
    SolverFailed(String),

    #[error("some odd-degree vertex cannot reach any partner")]
    Unreachable,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchingOutcome {
    Matched(Vec<SubRoute>),
    NotViable(NotViable),
}

/// Computes a minimum-weight perfect matching of the vertices `odd` in the complete
/// graph whose edge costs are the shortest-path distances `distances`.
pub trait MatchingBackend: Sync {
    /// Returns index pairs into `odd`. `odd` has even, nonzero length.
    fn min_weight_perfect_matching(
        &self,
        odd: &[Node],
        distances: &DistanceMatrix,
    ) -> Result<Vec<(usize, usize)>, NotViable>;
}

impl<B: MatchingBackend + ?Sized> MatchingBackend for &B {
    fn min_weight_perfect_matching(
        &self,
        odd: &[Node],
        distances: &DistanceMatrix,
    ) -> Result<Vec<(usize, usize)>, NotViable> {
        (**self).min_weight_perfect_matching(odd, distances)
    }
}

/// Runtime selection of a backend, as parsed from the command line
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BackendChoice {
    Highs(HighsMatching),
    Naive(NaiveMatching),
}

impl BackendChoice {
    pub fn with_timeout(self, timeout: Option<Duration>) -> Self {
        match self {
            Self::Highs(_) => Self::Highs(HighsMatching::new(timeout)),
            naive => naive,
        }
    }
}

impl Default for BackendChoice {
    fn default() -> Self {
        Self::Highs(HighsMatching::default())
    }
}

impl FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "highs" => Ok(Self::Highs(HighsMatching::default())),
            "naive" => Ok(Self::Naive(NaiveMatching)),
            other => Err(format!("unknown matching backend {other:?}; use highs or naive")),
        }
    }
}

impl MatchingBackend for BackendChoice {
    fn min_weight_perfect_matching(
        &self,
        odd: &[Node],
        distances: &DistanceMatrix,
    ) -> Result<Vec<(usize, usize)>, NotViable> {
        match self {
            Self::Highs(b) => b.min_weight_perfect_matching(odd, distances),
            Self::Naive(b) => b.min_weight_perfect_matching(odd, distances),
        }
    }
}

/// Backend whose solver never succeeds
#[cfg(test)]
pub(crate) struct FailingMatching;

#[cfg(test)]
impl MatchingBackend for FailingMatching {
    fn min_weight_perfect_matching(
        &self,
        _odd: &[Node],
        _distances: &DistanceMatrix,
    ) -> Result<Vec<(usize, usize)>, NotViable> {
        Err(NotViable::SolverFailed("no solver available".into()))
    }
}

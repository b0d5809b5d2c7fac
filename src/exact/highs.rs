use std::time::Duration;

use ::highs::{HighsModelStatus, Model, RowProblem, Sense};
use itertools::Itertools;
use log::trace;

use super::*;

/// Solves the matching as a 0/1 integer program with the HiGHS MIP solver: one binary
/// column per reachable pair of odd vertices weighted by their distance, and one row per
/// vertex requiring that exactly one of its pairs is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HighsMatching {
    timeout: Option<Duration>,
}

impl HighsMatching {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }
}

impl MatchingBackend for HighsMatching {
    fn min_weight_perfect_matching(
        &self,
        odd: &[Node],
        distances: &DistanceMatrix,
    ) -> Result<Vec<(usize, usize)>, NotViable> {
        let mut pb = RowProblem::default();

        let mut pairs = Vec::new();
        let mut columns_of = vec![Vec::new(); odd.len()];

        for ((i, &u), (j, &v)) in odd.iter().enumerate().tuple_combinations() {
            let Some(d) = distances.distance(u, v) else {
                continue;
            };

            let col = pb.add_integer_column(d as f64, 0..=1);
            columns_of[i].push(col);
            columns_of[j].push(col);
            pairs.push((i, j));
        }

        if columns_of.iter().any(|c| c.is_empty()) {
            return Err(NotViable::Unreachable);
        }

        for cols in columns_of {
            pb.add_row(1..=1, cols.into_iter().map(|c| (c, 1.0)));
        }

        let mut model = Model::new(pb);
        model.make_quiet();
        if let Some(tme) = self.timeout {
            model.set_option("time_limit", tme.as_secs_f64());
        }
        model.set_option("parallel", "off");
        model.set_option("threads", 1);
        model.set_sense(Sense::Minimise);

        let solved = model
            .try_solve()
            .map_err(|status| NotViable::SolverFailed(format!("{status:?}")))?;

        let status = solved.status();
        if status != HighsModelStatus::Optimal {
            return Err(NotViable::SolverFailed(format!("{status:?}")));
        }

        let solution = solved.get_solution();
        let selected = solution
            .columns()
            .iter()
            .zip(pairs)
            .filter_map(|(&x, pair)| (x > 0.5).then_some(pair))
            .collect_vec();

        trace!("HiGHS selected {} of {} odd vertices", 2 * selected.len(), odd.len());
        debug_assert_eq!(2 * selected.len(), odd.len());

        Ok(selected)
    }
}

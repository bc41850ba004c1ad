//! A local search engine driven by pluggable neighborhood operators and pivoting rules.

pub mod operators;

mod generator;
pub use self::generator::{
    GeneratorArc, GeneratorArcMove, GeneratorArcOperator, QuadraticNeighborhoodIterator,
};

mod pivoting;
pub use self::pivoting::{BestImprovement, FirstImprovement, KBestImprovement, PivotingRule};

#[cfg(test)]
#[path = "../../tests/unit/search/local_search_test.rs"]
mod local_search_test;

use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::Instance;
use crate::models::solution::Solution;
use std::any::Any;
use std::sync::Arc;

/// Moves with a cost delta above this threshold are treated as non-improving to prevent drift
/// from floating point artifacts.
pub const IMPROVEMENT_EPSILON: Cost = 1e-6;

/// Returns true if the given cost delta qualifies as improving.
pub fn is_improving(delta: Cost) -> bool {
    delta < -IMPROVEMENT_EPSILON
}

/// A neighborhood move: a small, addressable modification of a solution. Moves carry node
/// locations rather than references, so they stay valid as long as the addressed nodes are
/// live.
pub trait Move: Any {
    /// Returns the cost change the move would cause, computed without mutating the solution.
    fn cost_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost;

    /// Mutates the solution to the neighbor described by this move.
    fn apply(&self, instance: &Instance, solution: &mut Solution);

    /// Returns self as [`Any`] to allow operators to recover their own move types.
    fn as_any(&self) -> &dyn Any;
}

/// A shared handle to a move.
pub type SharedMove = Arc<dyn Move>;

/// A stateful generator of moves which enumerates a neighborhood in a deterministic order.
pub trait Operator {
    /// One-time setup before a neighborhood sweep.
    fn prepare_search(&mut self, solution: &Solution);

    /// Returns the next improving move, resuming strictly after `previous_move` when one is
    /// given, or `None` when the neighborhood is exhausted.
    fn find_next_improving_move(
        &mut self,
        evaluation: &dyn Evaluation,
        solution: &Solution,
        previous_move: Option<&dyn Move>,
    ) -> Option<SharedMove>;

    /// Teardown after a neighborhood sweep.
    fn finalize_search(&mut self);
}

/// The local search engine. Given a solution and a list of operators, repeatedly explores all
/// operators in order and applies qualifying improving moves until a full sweep yields none.
///
/// Candidate moves are enumerated with a cheap evaluation function; when an exact evaluation
/// function is configured, each candidate is re-priced by cloning the solution, re-labelling it
/// under the exact function, applying the move and differencing the total cost. Without an
/// exact function the cheap delta is trusted.
pub struct LocalSearch {
    instance: Arc<Instance>,
    evaluation: Arc<dyn Evaluation>,
    exact_evaluation: Option<Arc<dyn Evaluation>>,
    pivoting_rule: Box<dyn PivotingRule>,
}

impl LocalSearch {
    /// Creates a new instance of `LocalSearch`.
    pub fn new(
        instance: Arc<Instance>,
        evaluation: Arc<dyn Evaluation>,
        exact_evaluation: Option<Arc<dyn Evaluation>>,
        pivoting_rule: Box<dyn PivotingRule>,
    ) -> Self {
        Self { instance, evaluation, exact_evaluation, pivoting_rule }
    }

    /// Mutates the solution in place to a local optimum with respect to the given operators.
    pub fn optimize(&mut self, solution: &mut Solution, operators: &mut [Box<dyn Operator>]) {
        loop {
            let next_move = self.explore_neighborhood(solution, operators);
            match next_move {
                Some(next_move) => next_move.apply(&self.instance, solution),
                None => break,
            }
        }
    }

    fn explore_neighborhood(
        &mut self,
        solution: &Solution,
        operators: &mut [Box<dyn Operator>],
    ) -> Option<SharedMove> {
        for operator in operators.iter_mut() {
            operator.prepare_search(solution);

            let mut previous_move: Option<SharedMove> = None;
            loop {
                let next_move =
                    operator.find_next_improving_move(self.evaluation.as_ref(), solution, previous_move.as_deref());
                let Some(next_move) = next_move else { break };

                let delta = self.test_move(solution, next_move.as_ref());
                if is_improving(delta) && !self.pivoting_rule.continue_search(&next_move, delta, solution) {
                    operator.finalize_search();
                    return self.pivoting_rule.select_move(solution);
                }

                previous_move = Some(next_move);
            }

            operator.finalize_search();
        }

        self.pivoting_rule.select_move(solution)
    }

    fn test_move(&self, solution: &Solution, next_move: &dyn Move) -> Cost {
        if let Some(exact_evaluation) = &self.exact_evaluation {
            let mut copy = solution.clone();
            copy.set_evaluation(exact_evaluation.clone());
            let cost_before = copy.cost();
            next_move.apply(&self.instance, &mut copy);
            copy.cost() - cost_before
        } else {
            next_move.cost_delta(self.evaluation.as_ref(), &self.instance, solution)
        }
    }
}

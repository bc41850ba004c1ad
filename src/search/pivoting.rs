#[cfg(test)]
#[path = "../../tests/unit/search/pivoting_test.rs"]
mod pivoting_test;

use crate::evaluation::Cost;
use crate::models::solution::Solution;
use crate::search::SharedMove;

/// A pluggable selector which observes every improving move as it is found and decides when a
/// neighborhood sweep should stop. `select_move` returns the accepted move, if any, and resets
/// the rule for the next sweep.
pub trait PivotingRule {
    /// Observes an improving move together with its cost delta. Returns false to stop the
    /// current sweep.
    fn continue_search(&mut self, found_move: &SharedMove, delta: Cost, solution: &Solution) -> bool;

    /// Returns the selected move and resets the rule.
    fn select_move(&mut self, solution: &Solution) -> Option<SharedMove>;
}

/// Stops the sweep at the first improving move.
#[derive(Default)]
pub struct FirstImprovement {
    found: Option<SharedMove>,
}

impl FirstImprovement {
    /// Creates a new instance of `FirstImprovement`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PivotingRule for FirstImprovement {
    fn continue_search(&mut self, found_move: &SharedMove, _delta: Cost, _solution: &Solution) -> bool {
        self.found = Some(found_move.clone());
        false
    }

    fn select_move(&mut self, _solution: &Solution) -> Option<SharedMove> {
        self.found.take()
    }
}

/// Exhausts all operators and selects the move with the minimum cost delta.
#[derive(Default)]
pub struct BestImprovement {
    best: Option<(SharedMove, Cost)>,
}

impl BestImprovement {
    /// Creates a new instance of `BestImprovement`.
    pub fn new() -> Self {
        Self::default()
    }
}

impl PivotingRule for BestImprovement {
    fn continue_search(&mut self, found_move: &SharedMove, delta: Cost, _solution: &Solution) -> bool {
        if self.best.as_ref().map_or(true, |(_, best_delta)| delta < *best_delta) {
            self.best = Some((found_move.clone(), delta));
        }
        true
    }

    fn select_move(&mut self, _solution: &Solution) -> Option<SharedMove> {
        self.best.take().map(|(found_move, _)| found_move)
    }
}

/// Stops the sweep once `k` improving moves have been observed and selects the best of them.
pub struct KBestImprovement {
    k: usize,
    seen: usize,
    best: Option<(SharedMove, Cost)>,
}

impl KBestImprovement {
    /// Creates a new instance of `KBestImprovement`.
    pub fn new(k: usize) -> Self {
        assert!(k > 0);
        Self { k, seen: 0, best: None }
    }
}

impl PivotingRule for KBestImprovement {
    fn continue_search(&mut self, found_move: &SharedMove, delta: Cost, _solution: &Solution) -> bool {
        self.seen += 1;
        if self.best.as_ref().map_or(true, |(_, best_delta)| delta < *best_delta) {
            self.best = Some((found_move.clone(), delta));
        }
        self.seen < self.k
    }

    fn select_move(&mut self, _solution: &Solution) -> Option<SharedMove> {
        self.seen = 0;
        self.best.take().map(|(found_move, _)| found_move)
    }
}

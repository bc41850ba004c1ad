//! An adaptive large neighborhood layer which probabilistically schedules destroy and repair
//! operators and adapts their weights from observed score feedback.

mod insertion_cache;
pub use self::insertion_cache::{InsertionCache, InsertionMove};

mod operators;
pub use self::operators::{
    sample_positions, BestInsertion, RandomInsertion, RandomRemoval, WorstRemoval,
};

mod priority_list;
pub use self::priority_list::AdaptivePriorityList;

mod removal_cache;
pub use self::removal_cache::{RemovalCache, RemovalMove};

#[cfg(test)]
#[path = "../../tests/unit/lns/large_neighborhood_test.rs"]
mod large_neighborhood_test;

use crate::evaluation::Evaluation;
use crate::models::problem::VertexId;
use crate::models::solution::Solution;
use crate::utils::{Environment, GenericResult};
use std::sync::Arc;

/// A destroy operator: removes vertices from a solution and reports which ones it removed.
pub trait DestroyOperator {
    /// Applies the operator, destroying up to `number_of_removed_vertices` vertices, and
    /// returns the removed vertex ids.
    fn apply(
        &mut self,
        evaluation: Arc<dyn Evaluation>,
        solution: &mut Solution,
        number_of_removed_vertices: usize,
    ) -> GenericResult<Vec<VertexId>>;

    /// Returns the operator name.
    fn name(&self) -> &str;

    /// Returns true if the operator can be applied to the given solution.
    fn can_apply_to(&self, solution: &Solution) -> bool;
}

/// A repair operator: re-inserts orphaned vertices into a solution.
pub trait RepairOperator {
    /// Applies the operator, inserting the given missing vertices.
    fn apply(&mut self, evaluation: Arc<dyn Evaluation>, solution: &mut Solution, missing_vertices: &[VertexId]);

    /// Returns the operator name.
    fn name(&self) -> &str;

    /// Returns true if the operator can be applied to the given solution.
    fn can_apply_to(&self, solution: &Solution) -> bool;
}

/// Maintains weighted pools of destroy and repair operators, samples an operator pair to
/// perturb a solution, and adapts the pool weights from reported scores. Operators are
/// addressed by the index returned from the add methods.
pub struct AdaptiveLargeNeighborhood {
    environment: Arc<Environment>,
    destroy_operators: AdaptivePriorityList<Box<dyn DestroyOperator>>,
    repair_operators: AdaptivePriorityList<Box<dyn RepairOperator>>,
}

impl AdaptiveLargeNeighborhood {
    /// Creates a new instance of `AdaptiveLargeNeighborhood` with the given smoothing factor
    /// in `[0, 1]`.
    pub fn new(environment: Arc<Environment>, smoothing_factor: f64) -> Self {
        let destroy_operators = AdaptivePriorityList::new(environment.random.clone(), smoothing_factor);
        let repair_operators = AdaptivePriorityList::new(environment.random.clone(), smoothing_factor);
        Self { environment, destroy_operators, repair_operators }
    }

    /// Registers a destroy operator and returns its index. The operator starts with the
    /// current average weight of the destroy pool.
    pub fn add_destroy_operator(&mut self, operator: Box<dyn DestroyOperator>) -> usize {
        self.destroy_operators.add(operator)
    }

    /// Registers a repair operator and returns its index.
    pub fn add_repair_operator(&mut self, operator: Box<dyn RepairOperator>) -> usize {
        self.repair_operators.add(operator)
    }

    /// Removes the destroy operator at the given index. Later indices shift down by one.
    pub fn remove_destroy_operator(&mut self, index: usize) {
        self.destroy_operators.remove(index);
    }

    /// Removes the repair operator at the given index.
    pub fn remove_repair_operator(&mut self, index: usize) {
        self.repair_operators.remove(index);
    }

    /// Iterates over the destroy operators.
    pub fn destroy_operators(&self) -> impl Iterator<Item = &dyn DestroyOperator> + '_ {
        self.destroy_operators.iter().map(|operator| operator.as_ref())
    }

    /// Iterates over the repair operators.
    pub fn repair_operators(&self) -> impl Iterator<Item = &dyn RepairOperator> + '_ {
        self.repair_operators.iter().map(|operator| operator.as_ref())
    }

    /// Perturbs the solution: picks a destroy operator by roulette, applies it to remove
    /// `number_of_removed_vertices` vertices, then picks and applies a repair operator with the
    /// removed vertex list. Operators whose `can_apply_to` rejects the solution are re-sampled.
    /// Returns the indices of the chosen (destroy, repair) pair.
    pub fn generate(
        &mut self,
        evaluation: Arc<dyn Evaluation>,
        solution: &mut Solution,
        number_of_removed_vertices: usize,
    ) -> GenericResult<(usize, usize)> {
        if self.destroy_operators.is_empty() || self.repair_operators.is_empty() {
            return Err("tried to generate a neighborhood without any operators registered".into());
        }

        let destroy_index = loop {
            let index = self.destroy_operators.pick();
            if self.destroy_operators.get(index).can_apply_to(solution) {
                break index;
            }
        };
        let removed_vertices = self.destroy_operators.get_mut(destroy_index).apply(
            evaluation.clone(),
            solution,
            number_of_removed_vertices,
        )?;

        let repair_index = loop {
            let index = self.repair_operators.pick();
            if self.repair_operators.get(index).can_apply_to(solution) {
                break index;
            }
        };
        self.repair_operators.get_mut(repair_index).apply(evaluation, solution, &removed_vertices);

        Ok((destroy_index, repair_index))
    }

    /// Credits both operators of a generated pair with a score for the current period.
    pub fn collect_score(&mut self, destroy_index: usize, repair_index: usize, score: f64) {
        self.destroy_operators.update(destroy_index, score);
        self.repair_operators.update(repair_index, score);
    }

    /// Smoothes the collected period scores into the operator weights and resets the period
    /// counters.
    pub fn adapt_operator_weights(&mut self) {
        self.destroy_operators.adapt();
        self.repair_operators.adapt();

        (self.environment.logger)(&format!(
            "adapted operator weights: destroy=[{}], repair=[{}]",
            format_weights(&self.destroy_operators, |op| op.name()),
            format_weights(&self.repair_operators, |op| op.name()),
        ));
    }

    /// Sets all operator weights to 1 and clears the period counters.
    pub fn reset_operator_weights(&mut self) {
        self.destroy_operators.reset_weights();
        self.repair_operators.reset_weights();
    }
}

fn format_weights<T>(list: &AdaptivePriorityList<T>, name: impl Fn(&T) -> &str) -> String {
    (0..list.len())
        .map(|index| format!("{}: {:.3}", name(list.get(index)), list.weight(index)))
        .collect::<Vec<_>>()
        .join(", ")
}

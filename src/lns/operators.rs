#[cfg(test)]
#[path = "../../tests/unit/lns/operators_test.rs"]
mod operators_test;

use crate::evaluation::Evaluation;
use crate::lns::{DestroyOperator, InsertionCache, RemovalCache, RepairOperator};
use crate::models::problem::{Instance, VertexId};
use crate::models::solution::{number_of_nodes, NodeLocation, Solution};
use crate::utils::{GenericResult, Random};
use std::sync::Arc;

/// Samples `k` node positions from the solution without replacement using reservoir sampling.
/// End depots are never sampled; start depots only when `include_start_depot` is set. Returns
/// an error when fewer positions exist than requested.
pub fn sample_positions(
    solution: &Solution,
    random: &dyn Random,
    k: usize,
    include_start_depot: bool,
) -> GenericResult<Vec<NodeLocation>> {
    if k == 0 {
        return Ok(Vec::new());
    }
    if k > number_of_nodes(solution, include_start_depot) {
        return Err("cannot sample more positions than there are nodes in the solution".into());
    }

    let mut sample = Vec::with_capacity(k);
    let mut seen = 0_usize;
    for (route_index, route) in solution.routes().iter().enumerate() {
        let first_position = usize::from(!include_start_depot);
        for position in first_position..route.end_depot_position() {
            if sample.len() < k {
                // Always accept until full.
                sample.push(NodeLocation::new(route_index, position));
            } else {
                let slot = random.uniform_int(0, seen as i64) as usize;
                if slot < k {
                    sample[slot] = NodeLocation::new(route_index, position);
                }
            }
            seen += 1;
        }
    }

    Ok(sample)
}

/// Selects a move from an ordered sequence, skipping each entry with the given blink
/// probability and falling back to the last entry when every one was skipped.
fn select_with_blinks<'a, T>(
    moves: impl Iterator<Item = &'a T>,
    random: &dyn Random,
    blink_probability: f64,
) -> Option<&'a T> {
    let mut last = None;
    for candidate in moves {
        if !random.is_hit(blink_probability) {
            return Some(candidate);
        }
        last = Some(candidate);
    }
    last
}

/// A destroy operator which removes uniformly sampled vertices from the solution.
pub struct RandomRemoval {
    random: Arc<dyn Random>,
}

impl RandomRemoval {
    /// Creates a new instance of `RandomRemoval`.
    pub fn new(random: Arc<dyn Random>) -> Self {
        Self { random }
    }
}

impl DestroyOperator for RandomRemoval {
    fn apply(
        &mut self,
        _evaluation: Arc<dyn Evaluation>,
        solution: &mut Solution,
        number_of_removed_vertices: usize,
    ) -> GenericResult<Vec<VertexId>> {
        let positions = sample_positions(solution, self.random.as_ref(), number_of_removed_vertices, false)?;

        let removed_vertices =
            positions.iter().map(|&location| solution.node(location).vertex_id()).collect::<Vec<_>>();
        solution.remove_vertices(&positions);

        Ok(removed_vertices)
    }

    fn name(&self) -> &str {
        "RandomRemoval"
    }

    fn can_apply_to(&self, _solution: &Solution) -> bool {
        true
    }
}

/// A repair operator which inserts orphaned vertices at uniformly sampled positions. Batches
/// are sized to the current number of insertion points so that each round samples up-to-date
/// positions.
pub struct RandomInsertion {
    random: Arc<dyn Random>,
}

impl RandomInsertion {
    /// Creates a new instance of `RandomInsertion`.
    pub fn new(random: Arc<dyn Random>) -> Self {
        Self { random }
    }
}

impl RepairOperator for RandomInsertion {
    fn apply(&mut self, _evaluation: Arc<dyn Evaluation>, solution: &mut Solution, missing_vertices: &[VertexId]) {
        let mut next_missing_vertex = 0;
        while next_missing_vertex < missing_vertices.len() {
            let batch_size =
                number_of_nodes(solution, true).min(missing_vertices.len() - next_missing_vertex);
            let insertion_positions = sample_positions(solution, self.random.as_ref(), batch_size, true)
                .expect("batch size is bounded by the number of insertion points");

            let batch: Vec<(VertexId, NodeLocation)> = missing_vertices
                [next_missing_vertex..next_missing_vertex + batch_size]
                .iter()
                .zip(insertion_positions)
                .map(|(&vertex_id, location)| (vertex_id, location))
                .collect();

            solution.insert_vertices_after(&batch);
            next_missing_vertex += batch_size;
        }
    }

    fn name(&self) -> &str {
        "RandomInsertion"
    }

    fn can_apply_to(&self, solution: &Solution) -> bool {
        // Without routes there is no insertion point to sample.
        !solution.is_empty()
    }
}

/// A destroy operator which removes, one vertex at a time, the vertex whose removal saves the
/// most cost. A blink probability randomizes the choice; the underlying removal cache is
/// partially invalidated after every removal.
pub struct WorstRemoval {
    cache: RemovalCache,
    random: Arc<dyn Random>,
    blink_probability: f64,
}

impl WorstRemoval {
    /// Creates a new instance of `WorstRemoval`.
    pub fn new(instance: Arc<Instance>, random: Arc<dyn Random>, blink_probability: f64) -> Self {
        Self { cache: RemovalCache::new(instance), random, blink_probability }
    }
}

impl DestroyOperator for WorstRemoval {
    fn apply(
        &mut self,
        evaluation: Arc<dyn Evaluation>,
        solution: &mut Solution,
        number_of_removed_vertices: usize,
    ) -> GenericResult<Vec<VertexId>> {
        if number_of_removed_vertices > number_of_nodes(solution, false) {
            return Err("cannot remove more vertices than there are in the solution".into());
        }

        self.cache.rebuild(evaluation, solution);

        let mut removed_vertices = Vec::with_capacity(number_of_removed_vertices);
        while removed_vertices.len() < number_of_removed_vertices {
            let selected = *select_with_blinks(self.cache.moves_in_order(), self.random.as_ref(), self.blink_probability)
                .expect("the removal cache cannot be empty while vertices remain");

            solution.remove_vertex(selected.node_location);
            self.cache.invalidate_route(solution.route(selected.node_location.route), selected.node_location.route);
            removed_vertices.push(selected.vertex_id);
        }

        Ok(removed_vertices)
    }

    fn name(&self) -> &str {
        "WorstRemoval"
    }

    fn can_apply_to(&self, solution: &Solution) -> bool {
        !solution.is_empty()
    }
}

/// A repair operator which inserts orphaned vertices, one at a time, at their cheapest
/// insertion position. A blink probability randomizes the choice; station orphans are dropped.
pub struct BestInsertion {
    cache: InsertionCache,
    random: Arc<dyn Random>,
    blink_probability: f64,
}

impl BestInsertion {
    /// Creates a new instance of `BestInsertion`.
    pub fn new(instance: Arc<Instance>, random: Arc<dyn Random>, blink_probability: f64) -> Self {
        Self { cache: InsertionCache::new(instance), random, blink_probability }
    }
}

impl RepairOperator for BestInsertion {
    fn apply(&mut self, evaluation: Arc<dyn Evaluation>, solution: &mut Solution, missing_vertices: &[VertexId]) {
        let instance = solution.instance().clone();
        let customers: Vec<VertexId> =
            missing_vertices.iter().copied().filter(|&vertex_id| !instance.vertex(vertex_id).is_station).collect();

        self.cache.rebuild(evaluation, solution, &customers);

        for vertex_id in customers {
            let selected = *select_with_blinks(
                self.cache.best_insertions_for_vertex(vertex_id).iter(),
                self.random.as_ref(),
                self.blink_probability,
            )
            .expect("a solution with routes has at least one insertion position");

            self.cache.stop_tracking(vertex_id);
            solution.insert_vertex_after(selected.after_node, vertex_id);
            self.cache.invalidate_route(solution.route(selected.after_node.route), selected.after_node.route);
        }
    }

    fn name(&self) -> &str {
        "BestInsertion"
    }

    fn can_apply_to(&self, solution: &Solution) -> bool {
        !solution.is_empty()
    }
}

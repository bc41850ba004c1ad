#[cfg(test)]
#[path = "../../tests/unit/lns/removal_cache_test.rs"]
mod removal_cache_test;

use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::{Instance, VertexId};
use crate::models::solution::{number_of_nodes, NodeLocation, Route, Solution};
use crate::utils::compare_floats;
use std::sync::Arc;

/// A single-vertex removal move together with its cost delta.
#[derive(Clone, Copy, Debug)]
pub struct RemovalMove {
    /// Id of the removed vertex.
    pub vertex_id: VertexId,
    /// Location of the removed node.
    pub node_location: NodeLocation,
    /// Cost change caused by the removal.
    pub delta_cost: Cost,
}

/// Tracks the single-vertex removal move of every non-depot node in a solution, kept sorted in
/// ascending delta order. Rebuilt in full or partially invalidated per route as the solution
/// changes.
pub struct RemovalCache {
    instance: Arc<Instance>,
    evaluation: Option<Arc<dyn Evaluation>>,
    cache: Vec<RemovalMove>,
}

impl RemovalCache {
    /// Creates a new instance of `RemovalCache`.
    pub fn new(instance: Arc<Instance>) -> Self {
        Self { instance, evaluation: None, cache: Vec::new() }
    }

    /// Discards all moves and the captured evaluation function.
    pub fn clear(&mut self) {
        self.evaluation = None;
        self.cache.clear();
    }

    /// Populates the cache with the removal moves of every non-depot node of the solution.
    pub fn rebuild(&mut self, evaluation: Arc<dyn Evaluation>, solution: &Solution) {
        self.clear();
        self.evaluation = Some(evaluation);

        self.cache.reserve(number_of_nodes(solution, false));
        for (route_index, route) in solution.routes().iter().enumerate() {
            self.append_moves_of_route(route, route_index);
        }
        self.restore_order();
    }

    /// Recomputes only the entries whose location lies in the given route, then restores the
    /// delta order. The partition is linear in the cache size, the rewrite linear in the route
    /// length.
    pub fn invalidate_route(&mut self, route: &Route, route_index: usize) {
        assert!(self.evaluation.is_some(), "the cache must be rebuilt before invalidation");

        self.cache.retain(|removal_move| removal_move.node_location.route != route_index);
        self.append_moves_of_route(route, route_index);
        self.restore_order();
    }

    /// Iterates over the cached moves in ascending delta order.
    pub fn moves_in_order(&self) -> impl Iterator<Item = &RemovalMove> + '_ {
        self.cache.iter()
    }

    /// Returns true if the cache holds no moves.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    fn append_moves_of_route(&mut self, route: &Route, route_index: usize) {
        let evaluation = self.evaluation.as_ref().expect("the cache must be rebuilt first").clone();
        let route_cost = route.cost();

        for position in 1..route.end_depot_position() {
            let removal_cost = evaluation.evaluate(
                &self.instance,
                &[route.segment(0, position), route.segment(position + 1, route.len())],
            );
            self.cache.push(RemovalMove {
                vertex_id: route.get(position).unwrap().vertex_id(),
                node_location: NodeLocation::new(route_index, position),
                delta_cost: removal_cost - route_cost,
            });
        }
    }

    fn restore_order(&mut self) {
        self.cache.sort_by(|a, b| compare_floats(a.delta_cost, b.delta_cost));
    }
}

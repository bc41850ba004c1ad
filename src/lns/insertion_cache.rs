#[cfg(test)]
#[path = "../../tests/unit/lns/insertion_cache_test.rs"]
mod insertion_cache_test;

use crate::algorithms::structures::BitVec;
use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::{Instance, VertexId};
use crate::models::solution::{create_node_for, evaluate_insertion, NodeLocation, Route, Solution};
use crate::utils::compare_floats;
use std::sync::Arc;

/// A single-vertex insertion move together with its cost delta.
#[derive(Clone, Copy, Debug)]
pub struct InsertionMove {
    /// Id of the inserted vertex.
    pub vertex_id: VertexId,
    /// Location of the node after which the vertex would be inserted.
    pub after_node: NodeLocation,
    /// Cost change caused by the insertion.
    pub delta_cost: Cost,
}

/// Tracks, for each registered vertex, every possible insertion position in the current
/// solution, kept sorted per vertex in ascending delta order. Global iteration merges the
/// per-vertex sequences of the currently tracked vertices.
pub struct InsertionCache {
    instance: Arc<Instance>,
    evaluation: Option<Arc<dyn Evaluation>>,
    caches: Vec<Vec<InsertionMove>>,
    tracked_vertices: BitVec,
}

impl InsertionCache {
    /// Creates a new instance of `InsertionCache`.
    pub fn new(instance: Arc<Instance>) -> Self {
        let number_of_vertices = instance.number_of_vertices();
        Self {
            instance,
            evaluation: None,
            caches: vec![Vec::new(); number_of_vertices],
            tracked_vertices: BitVec::new(number_of_vertices),
        }
    }

    /// Discards all moves, tracked vertices and the captured evaluation function.
    pub fn clear(&mut self) {
        self.tracked_vertices.reset();
        self.caches.iter_mut().for_each(|cache| cache.clear());
        self.evaluation = None;
    }

    /// Populates the cache with every insertion move of the given vertices into the solution.
    pub fn rebuild(&mut self, evaluation: Arc<dyn Evaluation>, solution: &Solution, vertices: &[VertexId]) {
        self.clear();
        self.evaluation = Some(evaluation);

        for &vertex_id in vertices {
            for (route_index, route) in solution.routes().iter().enumerate() {
                self.append_moves_of_route(route, route_index, vertex_id);
            }
            self.restore_order(vertex_id);
            self.tracked_vertices.set(vertex_id, true);
        }
    }

    /// Recomputes, for every tracked vertex, the entries whose location lies in the given
    /// route, then restores the per-vertex delta order.
    pub fn invalidate_route(&mut self, route: &Route, route_index: usize) {
        assert!(self.evaluation.is_some(), "the cache must be rebuilt before invalidation");

        let tracked: Vec<VertexId> = self.tracked_vertices.iter_ones().collect();
        for vertex_id in tracked {
            self.caches[vertex_id].retain(|insertion_move| insertion_move.after_node.route != route_index);
            self.append_moves_of_route(route, route_index, vertex_id);
            self.restore_order(vertex_id);
        }
    }

    /// Stops tracking the given vertex. Its moves are excluded from iteration.
    pub fn stop_tracking(&mut self, vertex_id: VertexId) {
        self.tracked_vertices.set(vertex_id, false);
    }

    /// Returns true if the given vertex is currently tracked.
    pub fn tracks(&self, vertex_id: VertexId) -> bool {
        self.tracked_vertices.test(vertex_id)
    }

    /// Iterates over the ids of the currently tracked vertices.
    pub fn tracked_vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.tracked_vertices.iter_ones()
    }

    /// Returns the insertion moves of the given tracked vertex in ascending delta order.
    pub fn best_insertions_for_vertex(&self, vertex_id: VertexId) -> &[InsertionMove] {
        assert!(self.tracked_vertices.test(vertex_id), "vertex is not tracked");
        &self.caches[vertex_id]
    }

    /// Iterates over the moves of all tracked vertices in ascending delta order, merging the
    /// per-vertex sorted sequences.
    pub fn moves_in_order(&self) -> impl Iterator<Item = &InsertionMove> + '_ {
        let sequences: Vec<&[InsertionMove]> =
            self.tracked_vertices.iter_ones().map(|vertex_id| self.caches[vertex_id].as_slice()).collect();
        JointSortedIterator::new(sequences)
    }

    fn append_moves_of_route(&mut self, route: &Route, route_index: usize, vertex_id: VertexId) {
        let evaluation = self.evaluation.as_ref().expect("the cache must be rebuilt first").clone();
        let route_cost = route.cost();
        let node = create_node_for(evaluation.as_ref(), &self.instance, vertex_id);

        for position in 0..route.end_depot_position() {
            let insertion_cost = evaluate_insertion(evaluation.as_ref(), &self.instance, route, position, &node);
            self.caches[vertex_id].push(InsertionMove {
                vertex_id,
                after_node: NodeLocation::new(route_index, position),
                delta_cost: insertion_cost - route_cost,
            });
        }
    }

    fn restore_order(&mut self, vertex_id: VertexId) {
        self.caches[vertex_id].sort_by(|a, b| compare_floats(a.delta_cost, b.delta_cost));
    }
}

/// Merges several sorted sequences into one sorted iteration by repeatedly yielding the
/// cheapest head.
struct JointSortedIterator<'a> {
    sequences: Vec<&'a [InsertionMove]>,
}

impl<'a> JointSortedIterator<'a> {
    fn new(mut sequences: Vec<&'a [InsertionMove]>) -> Self {
        sequences.retain(|sequence| !sequence.is_empty());
        Self { sequences }
    }
}

impl<'a> Iterator for JointSortedIterator<'a> {
    type Item = &'a InsertionMove;

    fn next(&mut self) -> Option<Self::Item> {
        let cheapest_index = self
            .sequences
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| compare_floats(a[0].delta_cost, b[0].delta_cost))
            .map(|(index, _)| index)?;

        let (head, tail) = self.sequences[cheapest_index].split_first().unwrap();
        if tail.is_empty() {
            self.sequences.swap_remove(cheapest_index);
        } else {
            self.sequences[cheapest_index] = tail;
        }

        Some(head)
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/models/solution/route_test.rs"]
mod route_test;

use crate::evaluation::{Cost, Evaluation, Resource, RouteSegment};
use crate::models::problem::{Instance, VertexId};
use crate::models::solution::{create_node, create_node_for, Node};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

static NEXT_MODIFICATION_TIMESTAMP: AtomicUsize = AtomicUsize::new(1);

/// An ordered sequence of nodes whose first and last nodes reference the depot. The depot
/// sentinels are always present and may not be removed. After every mutation the route
/// re-propagates forward and backward labels across the modified range and refreshes its
/// modification timestamp, so `cost`, `feasible` and `cost_components` stay O(1) reads.
#[derive(Clone)]
pub struct Route {
    instance: Arc<Instance>,
    evaluation: Arc<dyn Evaluation>,
    nodes: Vec<Node>,
    modification_timestamp: usize,
}

impl Route {
    /// Creates an empty route consisting of the two depot sentinels.
    pub fn new(evaluation: Arc<dyn Evaluation>, instance: Arc<Instance>) -> Self {
        let depot = instance.depot().clone();
        let nodes = vec![create_node(evaluation.as_ref(), depot.clone()), create_node(evaluation.as_ref(), depot)];

        let mut route = Self { instance, evaluation, nodes, modification_timestamp: 0 };
        route.update();
        // Empty routes always get a timestamp of 0.
        route.modification_timestamp = 0;
        route
    }

    /// Creates a route visiting the given non-depot vertices in order.
    pub fn new_with_vertices(evaluation: Arc<dyn Evaluation>, instance: Arc<Instance>, vertices: &[VertexId]) -> Self {
        let depot = instance.depot().clone();
        assert!(vertices.iter().all(|&id| id != depot.id), "depot cannot appear between the sentinels");

        let mut nodes = Vec::with_capacity(vertices.len() + 2);
        nodes.push(create_node(evaluation.as_ref(), depot.clone()));
        nodes.extend(vertices.iter().map(|&id| create_node_for(evaluation.as_ref(), &instance, id)));
        nodes.push(create_node(evaluation.as_ref(), depot));

        let mut route = Self { instance, evaluation, nodes, modification_timestamp: 0 };
        route.update();
        route
    }

    /// Returns the route cost, read from the end depot's forward label.
    pub fn cost(&self) -> Cost {
        self.nodes.last().unwrap().cost(self.evaluation.as_ref())
    }

    /// Returns the per-dimension cost breakdown of the route.
    pub fn cost_components(&self) -> Vec<Resource> {
        self.nodes.last().unwrap().cost_components(self.evaluation.as_ref())
    }

    /// Returns true if the route satisfies all resource constraints.
    pub fn feasible(&self) -> bool {
        self.nodes.last().unwrap().feasible(self.evaluation.as_ref())
    }

    /// Returns the amount of nodes including the depot sentinels.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the route visits no vertex besides the depot sentinels.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 2
    }

    /// Returns the monotonically increasing timestamp of the last mutation.
    pub fn modification_timestamp(&self) -> usize {
        self.modification_timestamp
    }

    /// Returns the node at the given position.
    pub fn get(&self, position: usize) -> Option<&Node> {
        self.nodes.get(position)
    }

    /// Returns all nodes including the depot sentinels.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the position of the end depot sentinel.
    pub fn end_depot_position(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Returns the segment of nodes in `[begin, end)`.
    pub fn segment(&self, begin: usize, end: usize) -> RouteSegment {
        &self.nodes[begin..end]
    }

    /// Returns the evaluation function used by this route.
    pub fn evaluation(&self) -> &Arc<dyn Evaluation> {
        &self.evaluation
    }

    /// Returns the instance this route belongs to.
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// Sets the evaluation function to be used for this route and recomputes all labels.
    pub fn set_evaluation(&mut self, evaluation: Arc<dyn Evaluation>) {
        self.evaluation = evaluation;
        for node in self.nodes.iter_mut() {
            node.reset_labels(self.evaluation.as_ref());
        }
        self.update();
    }

    /// Removes the nodes in `[begin, end)`. The depot sentinels may not be removed.
    pub fn remove_segment(&mut self, begin: usize, end: usize) {
        self.remove_segment_no_update(begin, end);
        self.update();
    }

    /// Inserts the given nodes after the node at `pos`. Insertion after the end depot is
    /// forbidden.
    pub fn insert_segment_after(&mut self, pos: usize, nodes: Vec<Node>) {
        self.insert_segment_after_no_update(pos, nodes);
        self.update();
    }

    /// Removes the vertices at the given positions. Positions may come in arbitrary order; they
    /// are processed in descending order so that earlier removals do not invalidate later
    /// positions.
    pub fn remove_vertices(&mut self, positions: &[usize]) {
        if positions.is_empty() {
            return;
        }

        let mut positions = positions.to_vec();
        positions.sort_unstable_by(|a, b| b.cmp(a));

        for position in positions {
            assert!(position != 0 && position != self.end_depot_position(), "cannot remove a depot sentinel");
            self.nodes.remove(position);
        }
        self.update();
    }

    /// Inserts one vertex after each of the given positions. Positions refer to the unmodified
    /// route and may come in arbitrary order; they are processed in descending order.
    pub fn insert_vertices_after(&mut self, items: &[(VertexId, usize)]) {
        if items.is_empty() {
            return;
        }

        let mut items = items.to_vec();
        items.sort_unstable_by(|a, b| b.1.cmp(&a.1));

        for (vertex_id, position) in items {
            assert!(position < self.end_depot_position(), "cannot insert after the end depot");
            let node = create_node_for(self.evaluation.as_ref(), &self.instance, vertex_id);
            self.nodes.insert(position + 1, node);
        }
        self.update();
    }

    /// Exchanges the nodes in `[begin, end)` with the disjoint range `[other_begin, other_end)`
    /// of the same route. The shorter range is swapped element-wise; the surplus of the longer
    /// range is rotated into place, so the operation is linear in the length of the shorter
    /// range plus the number of displaced nodes.
    pub fn exchange_segments(&mut self, begin: usize, end: usize, other_begin: usize, other_end: usize) {
        assert!(end <= other_begin || other_end <= begin, "segments must be disjoint");
        assert!(begin != 0 && other_begin != 0, "cannot exchange the start depot");
        assert!(
            end <= self.end_depot_position() && other_end <= self.end_depot_position(),
            "cannot exchange the end depot"
        );

        if end - begin > other_end - other_begin {
            return self.exchange_segments(other_begin, other_end, begin, end);
        }

        // [begin, end) is the shorter of both ranges.
        let short_len = end - begin;
        for offset in 0..short_len {
            self.nodes.swap(begin + offset, other_begin + offset);
        }

        let other_first_unchanged = other_begin + short_len;
        if other_end <= begin {
            // Move the remaining [other_first_unchanged, other_end) backwards towards `end`.
            self.nodes[other_first_unchanged..end].rotate_left(other_end - other_first_unchanged);
        } else {
            // Move the remaining [other_first_unchanged, other_end) forwards towards `end`.
            self.nodes[end..other_end].rotate_left(other_first_unchanged - end);
        }

        self.update();
    }

    /// Exchanges the nodes in `[begin, end)` of this route with `[other_begin, other_end)` of
    /// another route.
    pub fn exchange_segments_with(
        &mut self,
        begin: usize,
        end: usize,
        other_begin: usize,
        other_end: usize,
        other: &mut Route,
    ) {
        assert!(begin != 0 && other_begin != 0, "cannot exchange the start depot");
        assert!(
            end <= self.end_depot_position() && other_end <= other.end_depot_position(),
            "cannot exchange the end depot"
        );

        if end - begin > other_end - other_begin {
            return other.exchange_segments_with(other_begin, other_end, begin, end, self);
        }

        // [begin, end) is the shorter of both ranges.
        let short_len = end - begin;
        for offset in 0..short_len {
            std::mem::swap(&mut self.nodes[begin + offset], &mut other.nodes[other_begin + offset]);
        }

        // Move the surplus of the longer range over to this route, just before `end`.
        let surplus: Vec<Node> = other.nodes.drain(other_begin + short_len..other_end).collect();
        self.nodes.splice(end..end, surplus);

        self.update();
        other.update();
    }

    /// Re-propagates all labels and refreshes the modification timestamp.
    pub fn update(&mut self) {
        self.update_range(0, self.end_depot_position());
    }

    /// Re-propagates labels across the modified range: forward labels after
    /// `last_valid_forward`, backward labels before `first_valid_backward`.
    pub fn update_range(&mut self, last_valid_forward: usize, first_valid_backward: usize) {
        for position in last_valid_forward + 1..self.nodes.len() {
            let (prefix, rest) = self.nodes.split_at_mut(position);
            let pred = &prefix[position - 1];
            let node = &mut rest[0];
            let edge = self.instance.edge(pred.vertex_id(), node.vertex_id());
            node.update_forward(self.evaluation.as_ref(), pred, edge);
        }

        for position in (0..first_valid_backward).rev() {
            let (prefix, rest) = self.nodes.split_at_mut(position + 1);
            let node = &mut prefix[position];
            let succ = &rest[0];
            let edge = self.instance.edge(node.vertex_id(), succ.vertex_id());
            node.update_backward(self.evaluation.as_ref(), succ, edge);
        }

        self.modification_timestamp = NEXT_MODIFICATION_TIMESTAMP.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the sequence of visited vertex ids including the depot sentinels.
    pub fn vertex_ids(&self) -> Vec<VertexId> {
        self.nodes.iter().map(|node| node.vertex_id()).collect()
    }

    fn remove_segment_no_update(&mut self, begin: usize, end: usize) {
        assert!(begin > 0, "cannot remove the start depot");
        assert!(end <= self.end_depot_position(), "cannot remove the end depot");
        self.nodes.drain(begin..end);
    }

    fn insert_segment_after_no_update(&mut self, pos: usize, nodes: Vec<Node>) {
        assert!(pos < self.end_depot_position(), "cannot insert after the end depot");
        self.nodes.splice(pos + 1..pos + 1, nodes);
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.vertex_ids() == other.vertex_ids()
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.nodes.iter()).finish()
    }
}

/// Returns the amount of nodes in the route without the end depot and, optionally, without the
/// start depot.
pub fn number_of_nodes_in_route(route: &Route, include_start_depot: bool) -> usize {
    route.len() - (2 - usize::from(include_start_depot))
}

/// Prices the insertion of a single node after the given position as a three segment
/// concatenation without mutating the route.
pub fn evaluate_insertion(
    evaluation: &dyn Evaluation,
    instance: &Instance,
    route: &Route,
    after: usize,
    node: &Node,
) -> Cost {
    evaluation.evaluate(
        instance,
        &[route.segment(0, after + 1), std::slice::from_ref(node), route.segment(after + 1, route.len())],
    )
}

#[cfg(test)]
#[path = "../../../tests/unit/models/solution/solution_test.rs"]
mod solution_test;

use crate::evaluation::{Cost, Evaluation, Resource};
use crate::models::problem::{Instance, VertexId};
use crate::models::solution::{create_node_for, number_of_nodes_in_route, Node, Route};
use std::sync::Arc;

/// A stable coordinate of a node within a solution: the route index and the 0-based position
/// inside the route, where the start depot is position 0. Used to address moves without
/// holding references into the containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeLocation {
    /// Index of the route within the solution.
    pub route: usize,
    /// Position of the node within the route.
    pub position: usize,
}

impl NodeLocation {
    /// Creates a new node location.
    pub fn new(route: usize, position: usize) -> Self {
        Self { route, position }
    }
}

/// An ordered collection of routes together with a vertex lookup index which maps each vertex
/// id to the locations where it currently appears. The index is rebuilt after every public
/// mutation; rebuild cost is linear in the total route length.
#[derive(Clone)]
pub struct Solution {
    routes: Vec<Route>,
    vertex_lookup: Vec<Vec<NodeLocation>>,
    instance: Arc<Instance>,
    evaluation: Arc<dyn Evaluation>,
}

impl Solution {
    /// Creates a solution with the given amount of empty routes.
    pub fn new(evaluation: Arc<dyn Evaluation>, instance: Arc<Instance>, num_routes: usize) -> Self {
        let routes = (0..num_routes).map(|_| Route::new(evaluation.clone(), instance.clone())).collect();
        let mut solution =
            Self { routes, vertex_lookup: vec![Vec::new(); instance.number_of_vertices()], instance, evaluation };
        solution.rebuild_vertex_lookup();
        solution
    }

    /// Creates a solution from existing routes.
    pub fn new_with_routes(evaluation: Arc<dyn Evaluation>, instance: Arc<Instance>, routes: Vec<Route>) -> Self {
        let mut solution =
            Self { routes, vertex_lookup: vec![Vec::new(); instance.number_of_vertices()], instance, evaluation };
        solution.rebuild_vertex_lookup();
        solution
    }

    /// Returns the locations where the given vertex currently appears.
    pub fn find(&self, vertex_id: VertexId) -> &[NodeLocation] {
        &self.vertex_lookup[vertex_id]
    }

    /// Returns the total cost of the solution.
    pub fn cost(&self) -> Cost {
        self.routes.iter().map(|route| route.cost()).sum()
    }

    /// Returns the per-dimension cost breakdown summed over all routes.
    pub fn cost_components(&self) -> Vec<Resource> {
        let mut result: Vec<Resource> = Vec::new();
        for route in &self.routes {
            let components = route.cost_components();
            if result.is_empty() {
                result = vec![0; components.len()];
            }
            for (acc, component) in result.iter_mut().zip(components) {
                *acc += component;
            }
        }
        result
    }

    /// Returns true if all routes are feasible.
    pub fn feasible(&self) -> bool {
        self.routes.iter().all(|route| route.feasible())
    }

    /// Returns the amount of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if the solution has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Returns the route at the given index.
    pub fn route(&self, index: usize) -> &Route {
        &self.routes[index]
    }

    /// Iterates over the routes.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the node addressed by the given location. Panics if the location does not refer
    /// to a live node.
    pub fn node(&self, location: NodeLocation) -> &Node {
        self.routes[location.route].get(location.position).expect("location does not refer to a live node")
    }

    /// Returns the instance this solution belongs to.
    pub fn instance(&self) -> &Arc<Instance> {
        &self.instance
    }

    /// Returns the evaluation function used by this solution.
    pub fn evaluation(&self) -> &Arc<dyn Evaluation> {
        &self.evaluation
    }

    /// Replaces the evaluation function on all routes and recomputes their labels.
    pub fn set_evaluation(&mut self, evaluation: Arc<dyn Evaluation>) {
        self.evaluation = evaluation;
        for route in self.routes.iter_mut() {
            route.set_evaluation(self.evaluation.clone());
        }
    }

    /// Exchanges a node segment of one route with a node segment of another (or the same)
    /// route, then rebuilds the vertex lookup.
    pub fn exchange_segment(
        &mut self,
        from_route: usize,
        from_begin: usize,
        from_end: usize,
        to_route: usize,
        to_begin: usize,
        to_end: usize,
    ) {
        if from_route == to_route {
            self.routes[from_route].exchange_segments(from_begin, from_end, to_begin, to_end);
        } else {
            let (from, to) = if from_route < to_route {
                let (left, right) = self.routes.split_at_mut(to_route);
                (&mut left[from_route], &mut right[0])
            } else {
                let (left, right) = self.routes.split_at_mut(from_route);
                (&mut right[0], &mut left[to_route])
            };
            from.exchange_segments_with(from_begin, from_end, to_begin, to_end, to);
        }
        self.rebuild_vertex_lookup();
    }

    /// Inserts a vertex after the given location, then rebuilds the vertex lookup.
    pub fn insert_vertex_after(&mut self, location: NodeLocation, vertex_id: VertexId) {
        let node = create_node_for(self.evaluation.as_ref(), &self.instance, vertex_id);
        self.routes[location.route].insert_segment_after(location.position, vec![node]);
        self.rebuild_vertex_lookup();
    }

    /// Removes the node at the given location, then rebuilds the vertex lookup.
    pub fn remove_vertex(&mut self, location: NodeLocation) {
        self.routes[location.route].remove_segment(location.position, location.position + 1);
        self.rebuild_vertex_lookup();
    }

    /// Removes the node segment `[begin, end)` from the given route, then rebuilds the vertex
    /// lookup.
    pub fn remove_route_segment(&mut self, route: usize, begin: usize, end: usize) {
        self.routes[route].remove_segment(begin, end);
        self.rebuild_vertex_lookup();
    }

    /// Removes the nodes at the given locations. Locations may come in arbitrary order; they
    /// are processed grouped by route in descending position order so that earlier removals do
    /// not invalidate later locations.
    pub fn remove_vertices(&mut self, locations: &[NodeLocation]) {
        if locations.is_empty() {
            return;
        }

        let mut locations = locations.to_vec();
        locations.sort_unstable_by(|a, b| b.cmp(a));

        let mut batch_begin = 0;
        while batch_begin < locations.len() {
            let route_index = locations[batch_begin].route;
            let batch_end = locations[batch_begin..]
                .iter()
                .position(|location| location.route != route_index)
                .map_or(locations.len(), |offset| batch_begin + offset);

            let positions: Vec<usize> =
                locations[batch_begin..batch_end].iter().map(|location| location.position).collect();
            self.routes[route_index].remove_vertices(&positions);

            batch_begin = batch_end;
        }
        self.rebuild_vertex_lookup();
    }

    /// Inserts one vertex after each of the given locations. Locations refer to the unmodified
    /// solution and may come in arbitrary order.
    pub fn insert_vertices_after(&mut self, items: &[(VertexId, NodeLocation)]) {
        if items.is_empty() {
            return;
        }

        let mut items = items.to_vec();
        items.sort_unstable_by(|a, b| b.1.cmp(&a.1));

        let mut batch_begin = 0;
        while batch_begin < items.len() {
            let route_index = items[batch_begin].1.route;
            let batch_end = items[batch_begin..]
                .iter()
                .position(|(_, location)| location.route != route_index)
                .map_or(items.len(), |offset| batch_begin + offset);

            let route_items: Vec<(VertexId, usize)> =
                items[batch_begin..batch_end].iter().map(|(vertex_id, location)| (*vertex_id, location.position)).collect();
            self.routes[route_index].insert_vertices_after(&route_items);

            batch_begin = batch_end;
        }
        self.rebuild_vertex_lookup();
    }

    /// Removes the route at the given index.
    pub fn remove_route(&mut self, route: usize) {
        self.routes.remove(route);
        self.rebuild_vertex_lookup();
    }

    /// Appends a new empty route and returns its index.
    pub fn add_empty_route(&mut self) -> usize {
        self.routes.push(Route::new(self.evaluation.clone(), self.instance.clone()));
        self.rebuild_vertex_lookup();
        self.routes.len() - 1
    }

    /// Appends the given route and returns its index.
    pub fn add_route(&mut self, route: Route) -> usize {
        self.routes.push(route);
        self.rebuild_vertex_lookup();
        self.routes.len() - 1
    }

    fn rebuild_vertex_lookup(&mut self) {
        for lookup in self.vertex_lookup.iter_mut() {
            lookup.clear();
        }

        for (route_index, route) in self.routes.iter().enumerate() {
            for (position, node) in route.nodes().iter().enumerate() {
                self.vertex_lookup[node.vertex_id()].push(NodeLocation::new(route_index, position));
            }
        }
    }
}

impl PartialEq for Solution {
    fn eq(&self, other: &Self) -> bool {
        self.routes == other.routes
    }
}

impl std::fmt::Debug for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solution").field("cost", &self.cost()).field("routes", &self.routes).finish()
    }
}

/// Returns the amount of nodes in the solution without end depots and, optionally, without
/// start depots.
pub fn number_of_nodes(solution: &Solution, include_start_depot: bool) -> usize {
    solution.routes().iter().map(|route| number_of_nodes_in_route(route, include_start_depot)).sum()
}

#[cfg(test)]
#[path = "../../../tests/unit/search/operators/station_insert_test.rs"]
mod station_insert_test;

use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::Instance;
use crate::models::solution::{create_node, evaluate_insertion, NodeLocation, Solution};
use crate::search::{is_improving, Move, Operator, SharedMove};
use std::any::Any;
use std::sync::Arc;

/// A position of an arc within a solution: the nodes at `position` and `position + 1` of the
/// route. Iterated route by route, position by position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SolutionArcPosition {
    /// Index of the route within the solution.
    pub route: usize,
    /// Position of the arc tail within the route.
    pub position: usize,
}

impl SolutionArcPosition {
    pub fn first(solution: &Solution) -> Option<Self> {
        (!solution.is_empty()).then_some(Self { route: 0, position: 0 })
    }

    /// Returns the next arc position, or `None` when the solution is exhausted.
    pub fn next(&self, solution: &Solution) -> Option<Self> {
        let mut arc = *self;
        arc.position += 1;
        // The last arc of a route ends at the end depot.
        if arc.position + 1 >= solution.route(arc.route).len() {
            arc.route += 1;
            arc.position = 0;
            if arc.route >= solution.len() {
                return None;
            }
        }
        Some(arc)
    }

    /// Returns the first arc position of the next route, or `None` when the solution is
    /// exhausted.
    pub fn next_route(&self, solution: &Solution) -> Option<Self> {
        let route = self.route + 1;
        (route < solution.len()).then_some(Self { route, position: 0 })
    }
}

/// A move which inserts a recharging station after a given node.
pub struct InsertStationMove {
    after: NodeLocation,
    station_index: usize,
}

impl InsertStationMove {
    /// Creates a new instance of `InsertStationMove`. The station is addressed by its
    /// zero-based station index.
    pub fn new(after: NodeLocation, station_index: usize) -> Self {
        Self { after, station_index }
    }
}

impl Move for InsertStationMove {
    fn cost_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost {
        let route = solution.route(self.after.route);
        let station = create_node(evaluation, instance.station(self.station_index).clone());

        evaluate_insertion(evaluation, instance, route, self.after.position, &station) - route.cost()
    }

    fn apply(&self, instance: &Instance, solution: &mut Solution) {
        solution.insert_vertex_after(self.after, instance.station(self.station_index).id);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An operator which tries to restore feasibility by inserting recharging stations into
/// infeasible routes. Feasible routes are skipped wholesale; enumeration resumes from the
/// previous move's insertion point and station.
pub struct InsertStationOperator {
    instance: Arc<Instance>,
}

impl InsertStationOperator {
    /// Creates a new instance of `InsertStationOperator`.
    pub fn new(instance: Arc<Instance>) -> Self {
        Self { instance }
    }

    fn recover_move(&self, solution: &Solution, previous_move: Option<&dyn Move>) -> (Option<SolutionArcPosition>, usize) {
        match previous_move {
            None => (SolutionArcPosition::first(solution), 0),
            Some(previous_move) => {
                let previous_move =
                    previous_move.as_any().downcast_ref::<InsertStationMove>().expect("previous move of a foreign operator");
                let arc = SolutionArcPosition { route: previous_move.after.route, position: previous_move.after.position };
                let station_index = previous_move.station_index + 1;
                if station_index >= self.instance.number_of_stations() {
                    (arc.next(solution), 0)
                } else {
                    (Some(arc), station_index)
                }
            }
        }
    }
}

impl Operator for InsertStationOperator {
    fn prepare_search(&mut self, _solution: &Solution) {}

    fn find_next_improving_move(
        &mut self,
        evaluation: &dyn Evaluation,
        solution: &Solution,
        previous_move: Option<&dyn Move>,
    ) -> Option<SharedMove> {
        let (mut next_arc, mut station_index) = self.recover_move(solution, previous_move);

        while let Some(arc) = next_arc {
            let route = solution.route(arc.route);
            if route.feasible() {
                next_arc = arc.next_route(solution);
                station_index = 0;
                continue;
            }

            for index in station_index..self.instance.number_of_stations() {
                let station = create_node(evaluation, self.instance.station(index).clone());
                let delta = evaluate_insertion(evaluation, &self.instance, route, arc.position, &station) - route.cost();
                if is_improving(delta) {
                    return Some(Arc::new(InsertStationMove::new(NodeLocation::new(arc.route, arc.position), index)));
                }
            }

            station_index = 0;
            next_arc = arc.next(solution);
        }

        None
    }

    fn finalize_search(&mut self) {}
}

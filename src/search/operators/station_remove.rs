#[cfg(test)]
#[path = "../../../tests/unit/search/operators/station_remove_test.rs"]
mod station_remove_test;

use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::Instance;
use crate::models::solution::{NodeLocation, Solution};
use crate::search::operators::SolutionArcPosition;
use crate::search::{is_improving, Move, Operator, SharedMove};
use std::any::Any;
use std::sync::Arc;

/// A move which removes a recharging station visit from a route.
pub struct RemoveStationMove {
    node: NodeLocation,
}

impl RemoveStationMove {
    /// Creates a new instance of `RemoveStationMove`.
    pub fn new(node: NodeLocation) -> Self {
        Self { node }
    }
}

impl Move for RemoveStationMove {
    fn cost_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost {
        let route = solution.route(self.node.route);

        let cost = evaluation.evaluate(
            instance,
            &[route.segment(0, self.node.position), route.segment(self.node.position + 1, route.len())],
        );
        cost - route.cost()
    }

    fn apply(&self, _instance: &Instance, solution: &mut Solution) {
        solution.remove_vertex(self.node);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// An operator which removes recharging station visits whose removal decreases the route cost.
/// Enumeration resumes strictly after the previous move's location.
pub struct RemoveStationOperator {
    instance: Arc<Instance>,
}

impl RemoveStationOperator {
    /// Creates a new instance of `RemoveStationOperator`.
    pub fn new(instance: Arc<Instance>) -> Self {
        Self { instance }
    }

    fn recover_move(&self, solution: &Solution, previous_move: Option<&dyn Move>) -> Option<SolutionArcPosition> {
        match previous_move {
            None => SolutionArcPosition::first(solution),
            Some(previous_move) => {
                let previous_move =
                    previous_move.as_any().downcast_ref::<RemoveStationMove>().expect("previous move of a foreign operator");
                SolutionArcPosition { route: previous_move.node.route, position: previous_move.node.position }
                    .next(solution)
            }
        }
    }
}

impl Operator for RemoveStationOperator {
    fn prepare_search(&mut self, _solution: &Solution) {}

    fn find_next_improving_move(
        &mut self,
        evaluation: &dyn Evaluation,
        solution: &Solution,
        previous_move: Option<&dyn Move>,
    ) -> Option<SharedMove> {
        let mut next_arc = self.recover_move(solution, previous_move);

        while let Some(arc) = next_arc {
            let route = solution.route(arc.route);
            let target = route.get(arc.position + 1).expect("arc target must be live");

            if target.vertex().is_station {
                let candidate = RemoveStationMove::new(NodeLocation::new(arc.route, arc.position + 1));
                if is_improving(candidate.cost_delta(evaluation, &self.instance, solution)) {
                    return Some(Arc::new(candidate));
                }
            }

            next_arc = arc.next(solution);
        }

        None
    }

    fn finalize_search(&mut self) {}
}

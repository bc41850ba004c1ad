#[cfg(test)]
#[path = "../../../tests/unit/search/operators/two_opt_test.rs"]
mod two_opt_test;

use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::Instance;
use crate::models::solution::{NodeLocation, Solution};
use crate::search::{GeneratorArcMove, GeneratorArcOperator, Move};
use std::any::Any;

/// A generator arc move which exchanges the tails of two distinct routes: everything after the
/// origin node moves to the target route and vice versa.
pub struct InterRouteTwoOptMove {
    origin: NodeLocation,
    target: NodeLocation,
}

/// An operator which explores the quadratic neighborhood of [`InterRouteTwoOptMove`].
pub type InterRouteTwoOptOperator = GeneratorArcOperator<InterRouteTwoOptMove>;

impl Move for InterRouteTwoOptMove {
    fn cost_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost {
        let origin_route = solution.route(self.origin.route);
        let target_route = solution.route(self.target.route);
        let origin_pos = self.origin.position;
        let target_pos = self.target.position;

        // Tail exchanges are symmetric in the route pair, so only ordered pairs are priced.
        if self.origin.route >= self.target.route {
            return 0.;
        }
        if origin_pos + 2 > origin_route.end_depot_position() || target_pos + 2 > target_route.end_depot_position() {
            return 0.;
        }
        if target_pos == 1 {
            return 0.;
        }

        let mut delta = evaluation.evaluate(
            instance,
            &[origin_route.segment(0, origin_pos + 1), target_route.segment(target_pos + 1, target_route.len())],
        );
        delta += evaluation.evaluate(
            instance,
            &[target_route.segment(0, target_pos + 1), origin_route.segment(origin_pos + 1, origin_route.len())],
        );
        delta - origin_route.cost() - target_route.cost()
    }

    fn apply(&self, _instance: &Instance, solution: &mut Solution) {
        let origin_end = solution.route(self.origin.route).end_depot_position();
        let target_end = solution.route(self.target.route).end_depot_position();

        solution.exchange_segment(
            self.origin.route,
            self.origin.position + 1,
            origin_end,
            self.target.route,
            self.target.position + 1,
            target_end,
        );
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl GeneratorArcMove for InterRouteTwoOptMove {
    fn new(origin: NodeLocation, target: NodeLocation) -> Self {
        Self { origin, target }
    }

    fn origin(&self) -> NodeLocation {
        self.origin
    }

    fn target(&self) -> NodeLocation {
        self.target
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/search/operators/swap_test.rs"]
mod swap_test;

use crate::evaluation::{Cost, Evaluation};
use crate::models::problem::Instance;
use crate::models::solution::{NodeLocation, Solution};
use crate::search::{GeneratorArcMove, GeneratorArcOperator, Move};
use std::any::Any;

/// A generator arc move which swaps the segment of `ORIGIN_LEN` nodes following the origin
/// node with the segment of `TARGET_LEN` nodes starting at the target node.
///
/// With `ORIGIN_LEN == 0` the move relocates instead: the segment of `TARGET_LEN` nodes
/// starting at the target node is moved to directly after the origin node.
pub struct SwapMove<const ORIGIN_LEN: usize, const TARGET_LEN: usize> {
    origin: NodeLocation,
    target: NodeLocation,
}

/// An operator which explores the quadratic neighborhood of [`SwapMove`]. `SwapOperator<0, 1>`
/// relocates single vertices, `SwapOperator<1, 1>` swaps vertex pairs, and so on.
pub type SwapOperator<const ORIGIN_LEN: usize, const TARGET_LEN: usize> =
    GeneratorArcOperator<SwapMove<ORIGIN_LEN, TARGET_LEN>>;

impl<const ORIGIN_LEN: usize, const TARGET_LEN: usize> SwapMove<ORIGIN_LEN, TARGET_LEN> {
    fn swap_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost {
        let origin_route = solution.route(self.origin.route);
        let target_route = solution.route(self.target.route);
        let origin_pos = self.origin.position;
        let target_pos = self.target.position;

        let origin_begin = origin_pos + 1;
        let origin_end = origin_begin + ORIGIN_LEN;
        let target_begin = target_pos;
        let target_end = target_begin + TARGET_LEN;

        // Any move that would swap the start or the end depot is invalid.
        if target_begin == 0 || origin_pos == origin_route.end_depot_position() {
            return 0.;
        }
        if target_end > target_route.end_depot_position() || origin_end > origin_route.end_depot_position() {
            return 0.;
        }

        // Visit each equivalence class of a symmetric swap exactly once.
        if ORIGIN_LEN == TARGET_LEN {
            if self.origin.route > self.target.route {
                return 0.;
            }
            if self.origin.route == self.target.route && origin_pos > target_pos {
                return 0.;
            }
        }

        if self.origin.route != self.target.route {
            // Individual exchanges can be priced independently.
            let mut delta = evaluation.evaluate(
                instance,
                &[
                    origin_route.segment(0, origin_begin),
                    target_route.segment(target_begin, target_end),
                    origin_route.segment(origin_end, origin_route.len()),
                ],
            );
            delta += evaluation.evaluate(
                instance,
                &[
                    target_route.segment(0, target_begin),
                    origin_route.segment(origin_begin, origin_end),
                    target_route.segment(target_end, target_route.len()),
                ],
            );
            delta - origin_route.cost() - target_route.cost()
        } else {
            // Overlapping segments cannot be exchanged.
            if !(target_end <= origin_begin || origin_end <= target_begin) {
                return 0.;
            }

            let route = origin_route;
            let delta = if target_end <= origin_begin {
                evaluation.evaluate(
                    instance,
                    &[
                        route.segment(0, target_begin),
                        route.segment(origin_begin, origin_end),
                        route.segment(target_end, origin_begin),
                        route.segment(target_begin, target_end),
                        route.segment(origin_end, route.len()),
                    ],
                )
            } else {
                evaluation.evaluate(
                    instance,
                    &[
                        route.segment(0, origin_begin),
                        route.segment(target_begin, target_end),
                        route.segment(origin_end, target_begin),
                        route.segment(origin_begin, origin_end),
                        route.segment(target_end, route.len()),
                    ],
                )
            };
            delta - route.cost()
        }
    }

    fn relocate_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost {
        let insert_route = solution.route(self.origin.route);
        let removal_route = solution.route(self.target.route);
        let insert_after = self.origin.position;
        let moved_begin = self.target.position;
        let moved_end = moved_begin + TARGET_LEN;

        // The moved segment may neither contain a depot sentinel nor be inserted after the end
        // depot.
        if moved_end > removal_route.end_depot_position() || moved_begin == 0 {
            return 0.;
        }
        if insert_after == insert_route.end_depot_position() {
            return 0.;
        }

        if self.origin.route != self.target.route {
            // Removal and insertion are priced independently.
            let mut delta = evaluation.evaluate(
                instance,
                &[removal_route.segment(0, moved_begin), removal_route.segment(moved_end, removal_route.len())],
            );
            delta += evaluation.evaluate(
                instance,
                &[
                    insert_route.segment(0, insert_after + 1),
                    removal_route.segment(moved_begin, moved_end),
                    insert_route.segment(insert_after + 1, insert_route.len()),
                ],
            );
            delta - insert_route.cost() - removal_route.cost()
        } else {
            // The insertion position may not lie within the moved segment.
            if insert_after >= moved_begin && insert_after < moved_end {
                return 0.;
            }
            // Relocating a segment to directly after its own predecessor is a no-op.
            if insert_after + 1 == moved_begin {
                return 0.;
            }

            let route = insert_route;
            let delta = if insert_after < moved_begin {
                evaluation.evaluate(
                    instance,
                    &[
                        route.segment(0, insert_after + 1),
                        route.segment(moved_begin, moved_end),
                        route.segment(insert_after + 1, moved_begin),
                        route.segment(moved_end, route.len()),
                    ],
                )
            } else {
                evaluation.evaluate(
                    instance,
                    &[
                        route.segment(0, moved_begin),
                        route.segment(moved_end, insert_after + 1),
                        route.segment(moved_begin, moved_end),
                        route.segment(insert_after + 1, route.len()),
                    ],
                )
            };
            delta - route.cost()
        }
    }
}

impl<const ORIGIN_LEN: usize, const TARGET_LEN: usize> Move for SwapMove<ORIGIN_LEN, TARGET_LEN> {
    fn cost_delta(&self, evaluation: &dyn Evaluation, instance: &Instance, solution: &Solution) -> Cost {
        if ORIGIN_LEN == 0 {
            self.relocate_delta(evaluation, instance, solution)
        } else {
            self.swap_delta(evaluation, instance, solution)
        }
    }

    fn apply(&self, _instance: &Instance, solution: &mut Solution) {
        if ORIGIN_LEN == 0 {
            let insert_at = self.origin.position + 1;
            solution.exchange_segment(
                self.origin.route,
                insert_at,
                insert_at,
                self.target.route,
                self.target.position,
                self.target.position + TARGET_LEN,
            );
        } else {
            solution.exchange_segment(
                self.origin.route,
                self.origin.position + 1,
                self.origin.position + 1 + ORIGIN_LEN,
                self.target.route,
                self.target.position,
                self.target.position + TARGET_LEN,
            );
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<const ORIGIN_LEN: usize, const TARGET_LEN: usize> GeneratorArcMove for SwapMove<ORIGIN_LEN, TARGET_LEN> {
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

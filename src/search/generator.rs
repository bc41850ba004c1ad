#[cfg(test)]
#[path = "../../tests/unit/search/generator_test.rs"]
mod generator_test;

use crate::algorithms::structures::ArcSet;
use crate::evaluation::Evaluation;
use crate::models::problem::Instance;
use crate::models::solution::{NodeLocation, Solution};
use crate::search::{is_improving, Move, Operator, SharedMove};
use std::marker::PhantomData;
use std::sync::Arc;

/// An ordered pair of node locations which a neighborhood move would turn into an arc of the
/// solution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorArc {
    /// The node the generated arc would leave.
    pub origin: NodeLocation,
    /// The node the generated arc would enter.
    pub target: NodeLocation,
}

/// Iterates over all `(origin route x origin node) x (target route x target node)` quadruples
/// of a solution in a canonical order: outer origin route, then origin position, inner target
/// route, then target position.
pub struct QuadraticNeighborhoodIterator<'a> {
    solution: &'a Solution,
    next_arc: Option<GeneratorArc>,
}

impl<'a> QuadraticNeighborhoodIterator<'a> {
    /// Creates an iterator positioned at the first quadruple.
    pub fn new(solution: &'a Solution) -> Self {
        let next_arc = if solution.is_empty() {
            None
        } else {
            Some(GeneratorArc { origin: NodeLocation::new(0, 0), target: NodeLocation::new(0, 0) })
        };
        Self { solution, next_arc }
    }

    /// Creates an iterator positioned strictly after the given quadruple.
    pub fn starting_after(solution: &'a Solution, origin: NodeLocation, target: NodeLocation) -> Self {
        let next_arc = advance(solution, GeneratorArc { origin, target });
        Self { solution, next_arc }
    }
}

fn advance(solution: &Solution, arc: GeneratorArc) -> Option<GeneratorArc> {
    let mut arc = arc;

    arc.target.position += 1;
    if arc.target.position == solution.route(arc.target.route).len() {
        arc.target.route += 1;
        arc.target.position = 0;

        if arc.target.route == solution.len() {
            arc.target.route = 0;

            arc.origin.position += 1;
            if arc.origin.position == solution.route(arc.origin.route).len() {
                arc.origin.route += 1;
                arc.origin.position = 0;

                if arc.origin.route == solution.len() {
                    return None;
                }
            }
        }
    }

    Some(arc)
}

impl<'a> Iterator for QuadraticNeighborhoodIterator<'a> {
    type Item = GeneratorArc;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next_arc?;
        self.next_arc = advance(self.solution, current);
        Some(current)
    }
}

/// A move indexed by the generator arc it would create.
pub trait GeneratorArcMove: Move + Sized + 'static {
    /// Creates the move for the given generator arc.
    fn new(origin: NodeLocation, target: NodeLocation) -> Self;

    /// Returns the origin location of the generator arc.
    fn origin(&self) -> NodeLocation;

    /// Returns the target location of the generator arc.
    fn target(&self) -> NodeLocation;
}

/// An operator which enumerates the quadratic generator arc neighborhood of a move type,
/// skipping self arcs and arcs excluded by an optional [`ArcSet`] filter, and returns the
/// first move whose cheap delta qualifies as improving.
pub struct GeneratorArcOperator<M> {
    instance: Arc<Instance>,
    arc_set: Option<Arc<ArcSet>>,
    _move: PhantomData<M>,
}

impl<M: GeneratorArcMove> GeneratorArcOperator<M> {
    /// Creates a new instance of `GeneratorArcOperator`.
    pub fn new(instance: Arc<Instance>, arc_set: Option<Arc<ArcSet>>) -> Self {
        Self { instance, arc_set, _move: PhantomData }
    }
}

impl<M: GeneratorArcMove> Operator for GeneratorArcOperator<M> {
    fn prepare_search(&mut self, _solution: &Solution) {}

    fn find_next_improving_move(
        &mut self,
        evaluation: &dyn Evaluation,
        solution: &Solution,
        previous_move: Option<&dyn Move>,
    ) -> Option<SharedMove> {
        let neighborhood = match previous_move {
            None => QuadraticNeighborhoodIterator::new(solution),
            Some(previous_move) => {
                let previous_move =
                    previous_move.as_any().downcast_ref::<M>().expect("previous move of a foreign operator");
                QuadraticNeighborhoodIterator::starting_after(solution, previous_move.origin(), previous_move.target())
            }
        };

        for arc in neighborhood {
            if arc.origin == arc.target {
                continue;
            }
            if let Some(arc_set) = &self.arc_set {
                let origin_vertex = solution.node(arc.origin).vertex_id();
                let target_vertex = solution.node(arc.target).vertex_id();
                if !arc_set.includes_arc(origin_vertex, target_vertex) {
                    continue;
                }
            }

            let candidate = M::new(arc.origin, arc.target);
            if is_improving(candidate.cost_delta(evaluation, &self.instance, solution)) {
                return Some(Arc::new(candidate));
            }
        }

        None
    }

    fn finalize_search(&mut self) {}
}

use super::*;
use crate::helpers::models::{create_cvrp_evaluation, create_cvrp_instance, create_solution};
use crate::models::solution::Solution;

fn create_test_solution(routes: &[&[usize]]) -> Solution {
    let distances: Vec<Vec<i64>> = (0..4).map(|i| (0..4).map(|j| if i == j { 0 } else { 1 }).collect()).collect();
    let rows: Vec<&[i64]> = distances.iter().map(|row| row.as_slice()).collect();
    let instance = create_cvrp_instance(&[0, 1, 1, 1], &rows, 2);
    create_solution(create_cvrp_evaluation(10), instance, routes)
}

#[test]
fn can_enumerate_all_quadruples_in_canonical_order() {
    let solution = create_test_solution(&[&[1], &[2]]);
    let arcs: Vec<GeneratorArc> = QuadraticNeighborhoodIterator::new(&solution).collect();

    // Two routes with three nodes each yield 6 x 6 quadruples.
    assert_eq!(arcs.len(), 36);
    assert_eq!(arcs[0].origin, NodeLocation::new(0, 0));
    assert_eq!(arcs[0].target, NodeLocation::new(0, 0));
    assert_eq!(arcs[1].target, NodeLocation::new(0, 1));
    assert_eq!(arcs[3].target, NodeLocation::new(1, 0));
    // The origin advances only after the target wrapped around.
    assert_eq!(arcs[6].origin, NodeLocation::new(0, 1));

    let mut sorted = arcs.clone();
    sorted.sort_by_key(|arc| (arc.origin, arc.target));
    assert_eq!(arcs, sorted);
}

#[test]
fn can_resume_strictly_after_previous_arc() {
    let solution = create_test_solution(&[&[1], &[2]]);
    let all: Vec<GeneratorArc> = QuadraticNeighborhoodIterator::new(&solution).collect();

    let resumed: Vec<GeneratorArc> =
        QuadraticNeighborhoodIterator::starting_after(&solution, all[4].origin, all[4].target).collect();

    assert_eq!(resumed.as_slice(), &all[5..]);
}

#[test]
fn can_filter_arcs_with_arc_set() {
    use crate::search::operators::SwapOperator;

    let solution = create_test_solution(&[&[1], &[2]]);
    let instance = solution.instance().clone();
    let evaluation = solution.evaluation().clone();

    let mut arc_set = ArcSet::new(instance.number_of_vertices());
    for from in 0..instance.number_of_vertices() {
        for to in 0..instance.number_of_vertices() {
            arc_set.forbid_arc(from, to);
        }
    }

    let mut operator = SwapOperator::<1, 1>::new(instance, Some(Arc::new(arc_set)));

    // With every arc forbidden no move can be generated.
    assert!(operator.find_next_improving_move(evaluation.as_ref(), &solution, None).is_none());
}

#[test]
fn can_exhaust_after_last_arc() {
    let solution = create_test_solution(&[&[1]]);
    let all: Vec<GeneratorArc> = QuadraticNeighborhoodIterator::new(&solution).collect();
    let last = all.last().unwrap();

    let mut resumed = QuadraticNeighborhoodIterator::starting_after(&solution, last.origin, last.target);

    assert!(resumed.next().is_none());
}

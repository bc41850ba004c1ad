use super::*;
use crate::helpers::models::{create_cvrp_evaluation, create_cvrp_instance, create_solution, route_vertex_ids};
use crate::models::problem::Instance;
use crate::models::solution::Solution;
use crate::search::GeneratorArcMove;
use std::sync::Arc;

const DISTANCES: [[i64; 6]; 6] = [
    [0, 2, 7, 4, 9, 3],
    [2, 0, 3, 6, 5, 8],
    [7, 3, 0, 2, 4, 6],
    [4, 6, 2, 0, 3, 5],
    [9, 5, 4, 3, 0, 2],
    [3, 8, 6, 5, 2, 0],
];

fn create_fixture() -> (Arc<Instance>, Arc<dyn Evaluation>, Solution) {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    let instance = create_cvrp_instance(&[0, 1, 1, 1, 1, 1], &rows, 2);
    let evaluation = create_cvrp_evaluation(100);
    let solution = create_solution(evaluation.clone(), instance.clone(), &[&[1, 2, 3], &[4, 5]]);
    (instance, evaluation, solution)
}

#[test]
fn can_exchange_route_tails() {
    let (instance, evaluation, mut solution) = create_fixture();

    let tail_exchange = InterRouteTwoOptMove::new(NodeLocation::new(0, 2), NodeLocation::new(1, 0));
    let delta = tail_exchange.cost_delta(evaluation.as_ref(), &instance, &solution);
    let cost_before = solution.cost();

    tail_exchange.apply(&instance, &mut solution);

    assert_eq!(route_vertex_ids(&solution), vec![vec![0, 1, 2, 4, 5, 0], vec![0, 3, 0]]);
    assert_eq!(delta, -3.);
    assert!((solution.cost() - cost_before - delta).abs() < 1e-9);
}

#[test]
fn can_skip_invalid_tail_exchanges() {
    let (instance, evaluation, solution) = create_fixture();

    // Only ordered route pairs are priced.
    let reversed = InterRouteTwoOptMove::new(NodeLocation::new(1, 1), NodeLocation::new(0, 1));
    assert_eq!(reversed.cost_delta(evaluation.as_ref(), &instance, &solution), 0.);

    // An origin at or behind the second-to-last node has no tail to give away.
    let empty_tail = InterRouteTwoOptMove::new(NodeLocation::new(0, 3), NodeLocation::new(1, 1));
    assert_eq!(empty_tail.cost_delta(evaluation.as_ref(), &instance, &solution), 0.);

    // A target directly behind the start depot is skipped.
    let first_customer = InterRouteTwoOptMove::new(NodeLocation::new(0, 1), NodeLocation::new(1, 1));
    assert_eq!(first_customer.cost_delta(evaluation.as_ref(), &instance, &solution), 0.);

    // A target too close to the end depot has no tail to give away.
    let target_tail = InterRouteTwoOptMove::new(NodeLocation::new(0, 1), NodeLocation::new(1, 2));
    assert_eq!(target_tail.cost_delta(evaluation.as_ref(), &instance, &solution), 0.);
}

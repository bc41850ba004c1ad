use super::*;
use crate::helpers::models::{create_adptw_evaluation, create_adptw_instance, AdptwVertexSpec};
use crate::models::problem::Instance;
use crate::models::solution::Route;
use crate::search::Operator;

const DISTANCES: [[i64; 4]; 4] = [[0, 5, 9, 30], [5, 0, 6, 2], [9, 6, 0, 5], [30, 2, 5, 0]];

fn create_test_instance() -> Arc<Instance> {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    let specs: Vec<AdptwVertexSpec> = (0..4).map(|_| AdptwVertexSpec::relaxed()).collect();
    create_adptw_instance(&specs, 1, &rows, 2, 1)
}

#[test]
fn can_remove_redundant_station() {
    let instance = create_test_instance();
    // A battery large enough to make the station detour pure overhead.
    let evaluation = create_adptw_evaluation(100, 100);
    let mut solution = Solution::new_with_routes(
        evaluation.clone(),
        instance.clone(),
        vec![Route::new_with_vertices(evaluation.clone(), instance.clone(), &[1, 3, 2])],
    );
    let cost_before = solution.cost();

    let mut operator = RemoveStationOperator::new(instance.clone());
    operator.prepare_search(&solution);
    let next_move = operator.find_next_improving_move(evaluation.as_ref(), &solution, None).unwrap();

    let delta = next_move.cost_delta(evaluation.as_ref(), &instance, &solution);
    next_move.apply(&instance, &mut solution);

    assert_eq!(solution.route(0).vertex_ids(), vec![0, 1, 2, 0]);
    assert_eq!(solution.cost() - cost_before, delta);
    assert_eq!(delta, -1.);

    // Resuming strictly after the previous location finds nothing more.
    assert!(operator.find_next_improving_move(evaluation.as_ref(), &solution, Some(next_move.as_ref())).is_none());
    operator.finalize_search();
}

#[test]
fn can_keep_station_the_route_depends_on() {
    let instance = create_test_instance();
    let evaluation = create_adptw_evaluation(28, 100);
    let solution = Solution::new_with_routes(
        evaluation.clone(),
        instance.clone(),
        vec![Route::new_with_vertices(evaluation.clone(), instance.clone(), &[1, 3, 2])],
    );

    let mut operator = RemoveStationOperator::new(instance);

    assert!(operator.find_next_improving_move(evaluation.as_ref(), &solution, None).is_none());
}

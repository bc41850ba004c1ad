use super::*;
use crate::evaluation::ConcatenationBased;
use crate::helpers::models::{create_cvrp_evaluation, create_cvrp_instance};
use crate::models::solution::Route;
use std::sync::Arc;

const DISTANCES: [[i64; 4]; 4] = [[0, 5, 9, 4], [5, 0, 3, 7], [9, 3, 0, 6], [4, 7, 6, 0]];

fn create_test_route(storage_capacity: i64, vertices: &[usize]) -> Route {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    let instance = create_cvrp_instance(&[0, 4, 4, 4], &rows, 1);
    Route::new_with_vertices(create_cvrp_evaluation(storage_capacity), instance, vertices)
}

#[test]
fn can_compute_cost_of_feasible_route() {
    let route = create_test_route(100, &[1, 2, 3]);

    // 0->1->2->3->0 with no overload
    assert_eq!(route.cost(), (5 + 3 + 6 + 4) as f64);
    assert!(route.feasible());
    assert_eq!(route.cost_components(), vec![5 + 3 + 6 + 4, 0]);
}

#[test]
fn can_penalize_overload() {
    let route = create_test_route(10, &[1, 2, 3]);

    // Total demand 12 exceeds the capacity by 2.
    assert_eq!(route.cost(), (5 + 3 + 6 + 4 + 2) as f64);
    assert!(!route.feasible());
    assert_eq!(route.cost_components(), vec![5 + 3 + 6 + 4, 2]);
}

#[test]
fn can_price_partition_of_overloaded_route() {
    let route = create_test_route(10, &[1, 2, 3]);
    let instance = route.instance().clone();
    let evaluation = route.evaluation().clone();

    for split in 1..route.len() {
        let cost = evaluation.evaluate(&instance, &[route.segment(0, split), route.segment(split, route.len())]);
        assert!((cost - route.cost()).abs() < 1e-9, "partition at {split} diverged");
    }
}

#[test]
fn can_scale_overload_penalty() {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    let instance = create_cvrp_instance(&[0, 4, 4, 4], &rows, 1);

    let mut evaluation = CvrpEvaluation::new(10);
    evaluation.set_penalty_factors([1., 10.]);
    assert_eq!(evaluation.penalty_factors(), [1., 10.]);

    let evaluation: Arc<dyn crate::evaluation::Evaluation> = Arc::new(ConcatenationBased::new(evaluation));
    let route = Route::new_with_vertices(evaluation, instance, &[1, 2, 3]);

    assert_eq!(route.cost(), (5 + 3 + 6 + 4) as f64 + 2. * 10.);
}

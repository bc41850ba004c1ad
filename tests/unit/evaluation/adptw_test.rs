use super::*;
use crate::helpers::models::{create_adptw_evaluation, create_adptw_instance, AdptwVertexSpec};
use crate::models::problem::Instance;
use crate::models::solution::Route;
use std::sync::Arc;

const DISTANCES: [[i64; 3]; 3] = [[0, 5, 9], [5, 0, 6], [9, 6, 0]];

fn create_test_instance(specs: Vec<AdptwVertexSpec>, consumption_factor: i64) -> Arc<Instance> {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    create_adptw_instance(&specs, 0, &rows, consumption_factor, 1)
}

fn relaxed_specs() -> Vec<AdptwVertexSpec> {
    vec![AdptwVertexSpec::relaxed(), AdptwVertexSpec::relaxed(), AdptwVertexSpec::relaxed()]
}

#[test]
fn can_compute_cost_of_relaxed_route() {
    let instance = create_test_instance(relaxed_specs(), 1);
    let route = Route::new_with_vertices(create_adptw_evaluation(100, 100), instance, &[1, 2]);

    // 0->1->2->0, all resources within limits
    assert_eq!(route.cost(), (5 + 6 + 9) as f64);
    assert!(route.feasible());
    assert_eq!(route.cost_components(), vec![5 + 6 + 9, 0, 0, 0]);
}

#[test]
fn can_penalize_time_window_violation() {
    let mut specs = relaxed_specs();
    // Vertex 1 closes before travel from the depot completes.
    specs[1].latest = 3;
    let instance = create_test_instance(specs, 1);
    let route = Route::new_with_vertices(create_adptw_evaluation(100, 100), instance, &[1]);

    // Arrival at 5 exceeds the deadline 3 by 2.
    assert_eq!(route.cost(), (5 + 5 + 2) as f64);
    assert!(!route.feasible());
    assert_eq!(route.cost_components(), vec![10, 0, 0, 2]);
}

#[test]
fn can_penalize_overcharge() {
    let instance = create_test_instance(relaxed_specs(), 2);
    // Consumption 10 per leg against a battery of 15.
    let route = Route::new_with_vertices(create_adptw_evaluation(15, 100), instance, &[1]);

    assert_eq!(route.cost(), (5 + 5 + 5) as f64);
    assert!(!route.feasible());
    assert_eq!(route.cost_components(), vec![10, 0, 5, 0]);
}

#[test]
fn can_keep_route_feasible_with_sufficient_battery() {
    let instance = create_test_instance(relaxed_specs(), 2);
    let route = Route::new_with_vertices(create_adptw_evaluation(20, 100), instance, &[1]);

    assert_eq!(route.cost(), 10.);
    assert!(route.feasible());
}

#[test]
fn can_price_partition_of_penalized_route() {
    let mut specs = relaxed_specs();
    specs[1].latest = 3;
    specs[2].latest = 8;
    let instance = create_test_instance(specs, 2);
    let evaluation = create_adptw_evaluation(15, 100);
    let route = Route::new_with_vertices(evaluation.clone(), instance.clone(), &[1, 2]);

    for split in 1..route.len() {
        let cost = evaluation.evaluate(&instance, &[route.segment(0, split), route.segment(split, route.len())]);
        assert!(
            (cost - route.cost()).abs() < 1e-9,
            "partition at {split} diverged: {cost} vs {}",
            route.cost()
        );
    }
}

#[test]
fn can_price_partition_of_feasible_route() {
    let instance = create_test_instance(relaxed_specs(), 1);
    let evaluation = create_adptw_evaluation(100, 100);
    let route = Route::new_with_vertices(evaluation.clone(), instance.clone(), &[2, 1]);

    for split in 1..route.len() {
        let cost = evaluation.evaluate(&instance, &[route.segment(0, split), route.segment(split, route.len())]);
        assert!((cost - route.cost()).abs() < 1e-9, "partition at {split} diverged");
    }
}

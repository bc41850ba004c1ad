use super::*;
use crate::helpers::models::{create_cvrp_evaluation, create_cvrp_instance};
use crate::models::problem::Instance;
use proptest::prelude::*;

const DISTANCES: [[i64; 6]; 6] = [
    [0, 2, 7, 4, 9, 3],
    [2, 0, 3, 6, 5, 8],
    [7, 3, 0, 2, 4, 6],
    [4, 6, 2, 0, 3, 5],
    [9, 5, 4, 3, 0, 2],
    [3, 8, 6, 5, 2, 0],
];

fn create_test_instance() -> Arc<Instance> {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    create_cvrp_instance(&[0, 1, 1, 1, 1, 1], &rows, 2)
}

fn create_test_route(instance: &Arc<Instance>, vertices: &[usize]) -> Route {
    Route::new_with_vertices(create_cvrp_evaluation(100), instance.clone(), vertices)
}

/// Rebuilds the route from scratch and compares costs, which verifies that incrementally
/// updated labels match a full propagation.
fn assert_labels_consistent(instance: &Arc<Instance>, route: &Route) {
    let ids = route.vertex_ids();
    let rebuilt = create_test_route(instance, &ids[1..ids.len() - 1]);

    assert_eq!(route.vertex_ids(), rebuilt.vertex_ids());
    assert!((route.cost() - rebuilt.cost()).abs() < 1e-9);
    assert_eq!(route.cost_components(), rebuilt.cost_components());
}

#[test]
fn can_create_empty_route() {
    let instance = create_test_instance();

    let route = Route::new(create_cvrp_evaluation(100), instance);

    assert!(route.is_empty());
    assert_eq!(route.len(), 2);
    assert_eq!(route.cost(), 0.);
    assert_eq!(route.modification_timestamp(), 0);
    assert_eq!(route.vertex_ids(), vec![0, 0]);
}

#[test]
fn can_create_route_from_vertices() {
    let instance = create_test_instance();

    let route = create_test_route(&instance, &[1, 2, 3]);

    assert_eq!(route.vertex_ids(), vec![0, 1, 2, 3, 0]);
    // 0->1->2->3->0
    assert_eq!(route.cost(), (2 + 3 + 2 + 4) as f64);
    assert!(route.feasible());
    assert!(route.modification_timestamp() > 0);
}

#[test]
fn can_remove_segment() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2, 3, 4]);

    route.remove_segment(2, 4);

    assert_eq!(route.vertex_ids(), vec![0, 1, 4, 0]);
    assert_labels_consistent(&instance, &route);
}

#[test]
fn can_insert_segment_after() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 4]);
    let evaluation = route.evaluation().clone();

    let nodes = vec![create_node_for(evaluation.as_ref(), &instance, 2), create_node_for(evaluation.as_ref(), &instance, 3)];
    route.insert_segment_after(1, nodes);

    assert_eq!(route.vertex_ids(), vec![0, 1, 2, 3, 4, 0]);
    assert_labels_consistent(&instance, &route);
}

#[test]
fn can_remove_vertices_given_in_arbitrary_order() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2, 3, 4]);

    route.remove_vertices(&[1, 3]);

    assert_eq!(route.vertex_ids(), vec![0, 2, 4, 0]);
    assert_labels_consistent(&instance, &route);
}

#[test]
fn can_insert_vertices_given_in_arbitrary_order() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2]);

    route.insert_vertices_after(&[(3, 0), (4, 2)]);

    assert_eq!(route.vertex_ids(), vec![0, 3, 1, 2, 4, 0]);
    assert_labels_consistent(&instance, &route);
}

#[test]
fn can_exchange_segments_within_route() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2, 3, 4, 5]);

    // Exchange [1] with [3, 4].
    route.exchange_segments(1, 2, 3, 5);

    assert_eq!(route.vertex_ids(), vec![0, 3, 4, 2, 1, 5, 0]);
    assert_labels_consistent(&instance, &route);
}

#[test]
fn can_exchange_segments_of_different_length_across_routes() {
    let instance = create_test_instance();
    let mut first = create_test_route(&instance, &[1, 2]);
    let mut second = create_test_route(&instance, &[3, 4, 5]);

    first.exchange_segments_with(1, 2, 1, 4, &mut second);

    assert_eq!(first.vertex_ids(), vec![0, 3, 4, 5, 2, 0]);
    assert_eq!(second.vertex_ids(), vec![0, 1, 0]);
    assert_labels_consistent(&instance, &first);
    assert_labels_consistent(&instance, &second);
}

#[test]
fn can_exchange_empty_segment_to_relocate_across_routes() {
    let instance = create_test_instance();
    let mut first = create_test_route(&instance, &[1, 2]);
    let mut second = create_test_route(&instance, &[3, 4]);

    // Move [3] to directly after vertex 1.
    first.exchange_segments_with(2, 2, 1, 2, &mut second);

    assert_eq!(first.vertex_ids(), vec![0, 1, 3, 2, 0]);
    assert_eq!(second.vertex_ids(), vec![0, 4, 0]);
}

#[test]
fn can_update_modification_timestamp_on_mutation() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2]);
    let timestamp = route.modification_timestamp();

    route.remove_segment(1, 2);

    assert!(route.modification_timestamp() > timestamp);
}

#[test]
#[should_panic]
fn cannot_remove_start_depot() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2]);

    route.remove_segment(0, 1);
}

#[test]
#[should_panic]
fn cannot_remove_end_depot() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1, 2]);

    route.remove_segment(3, 4);
}

#[test]
#[should_panic]
fn cannot_insert_after_end_depot() {
    let instance = create_test_instance();
    let mut route = create_test_route(&instance, &[1]);
    let evaluation = route.evaluation().clone();

    let nodes = vec![create_node_for(evaluation.as_ref(), &instance, 2)];
    route.insert_segment_after(2, nodes);
}

proptest! {
    #[test]
    fn can_keep_labels_consistent_under_bulk_edits(
        vertices in proptest::collection::vec(1_usize..=5, 1..8),
        removals in proptest::collection::vec(0_usize..100, 0..4),
    ) {
        let instance = create_test_instance();
        let mut route = create_test_route(&instance, &vertices);

        for removal in removals {
            if route.is_empty() {
                break;
            }
            let position = 1 + removal % (route.len() - 2);
            route.remove_vertices(&[position]);
        }

        let ids = route.vertex_ids();
        let rebuilt = create_test_route(&instance, &ids[1..ids.len() - 1]);
        prop_assert!((route.cost() - rebuilt.cost()).abs() < 1e-9);
    }
}

use super::*;
use crate::helpers::models::{create_adptw_instance, AdptwVertexSpec};

const DISTANCES: [[i64; 4]; 4] = [[0, 8, 8, 30], [8, 0, 8, 4], [8, 8, 0, 4], [30, 4, 4, 0]];

fn create_test_propagator(battery_capacity: Resource) -> (Arc<Instance>, AdptwPropagator) {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    let specs: Vec<AdptwVertexSpec> = (0..4).map(|_| AdptwVertexSpec::relaxed()).collect();
    let instance = create_adptw_instance(&specs, 1, &rows, 1, 1);
    (instance.clone(), AdptwPropagator::new(instance, battery_capacity))
}

fn propagate(
    instance: &Arc<Instance>,
    propagator: &AdptwPropagator,
    label: &AdptwLabel,
    slot: usize,
    from: usize,
    to: usize,
) -> Option<AdptwLabel> {
    propagator.propagate(label, slot, instance.vertex(from), instance.vertex(to), instance.edge(from, to))
}

#[test]
fn can_propagate_along_customer_path() {
    let (instance, propagator) = create_test_propagator(20);
    let root = propagator.create_root_label();

    let at_customer = propagate(&instance, &propagator, &root, 0, 0, 1).unwrap();

    assert_eq!(at_customer.cost, 8);
    assert_eq!(at_customer.t_min, 8);
    assert_eq!(at_customer.rt_max, 8);
    assert!(!at_customer.visited_station());
    assert!(at_customer.visited(1));
    assert_eq!(at_customer.predecessor(), Some(0));
    assert!(!propagator.is_final_label(&at_customer));
}

#[test]
fn can_prune_cycles() {
    let (instance, propagator) = create_test_propagator(35);
    let root = propagator.create_root_label();
    let at_station = propagate(&instance, &propagator, &root, 0, 0, 3).unwrap();

    assert!(propagate(&instance, &propagator, &at_station, 1, 3, 3).is_none());
}

#[test]
fn can_reset_station_visits_at_customer() {
    let (instance, propagator) = create_test_propagator(30);
    let root = propagator.create_root_label();
    let at_customer = propagate(&instance, &propagator, &root, 0, 0, 1).unwrap();
    let at_station = propagate(&instance, &propagator, &at_customer, 1, 1, 3).unwrap();
    assert!(at_station.visited(3));
    assert!(at_station.visited_station());

    let at_next_customer = propagate(&instance, &propagator, &at_station, 2, 3, 2).unwrap();

    // The bitset resets at a customer, so the station could be revisited later.
    assert!(!at_next_customer.visited(3));
    assert!(at_next_customer.visited(2));
    // The path-level station counter does not reset.
    assert!(at_next_customer.visited_station());
}

#[test]
fn can_prune_exhausted_battery() {
    let (instance, propagator) = create_test_propagator(7);
    let root = propagator.create_root_label();

    assert!(propagate(&instance, &propagator, &root, 0, 0, 1).is_none());
}

#[test]
fn can_detect_final_label() {
    let (instance, propagator) = create_test_propagator(20);
    let root = propagator.create_root_label();
    assert!(!propagator.is_final_label(&root));

    let at_customer = propagate(&instance, &propagator, &root, 0, 0, 1).unwrap();
    let back_at_depot = propagate(&instance, &propagator, &at_customer, 1, 1, 0).unwrap();

    assert!(propagator.is_final_label(&back_at_depot));
}

#[test]
fn can_order_labels_by_cost_then_station_count() {
    let (instance, propagator) = create_test_propagator(30);
    let root = propagator.create_root_label();
    let direct = propagate(&instance, &propagator, &root, 0, 0, 2).unwrap();
    let mut detour = propagate(&instance, &propagator, &root, 0, 0, 1).unwrap();
    detour.cost = direct.cost;
    detour.num_stations = 1;

    assert!(propagator.cheaper_than(&direct, &detour));
    assert!(!propagator.cheaper_than(&detour, &direct));
}

#[test]
fn can_establish_dominance() {
    let (instance, propagator) = create_test_propagator(30);
    let root = propagator.create_root_label();
    let label = propagate(&instance, &propagator, &root, 0, 0, 1).unwrap();

    let mut worse = label.clone();
    worse.cost += 5;
    worse.t_min += 1;

    assert!(propagator.dominates(&label, &worse));
    assert!(!propagator.dominates(&worse, &label));
}

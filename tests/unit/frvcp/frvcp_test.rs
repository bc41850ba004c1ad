use super::*;
use crate::helpers::models::{create_adptw_instance, AdptwVertexSpec};

const DISTANCES: [[i64; 4]; 4] = [[0, 8, 8, 30], [8, 0, 8, 4], [8, 8, 0, 4], [30, 4, 4, 0]];

fn create_test_instance() -> Arc<Instance> {
    let rows: Vec<&[i64]> = DISTANCES.iter().map(|row| row.as_slice()).collect();
    let specs: Vec<AdptwVertexSpec> = (0..4).map(|_| AdptwVertexSpec::relaxed()).collect();
    // The last vertex is a recharging station; consumption equals the distance.
    create_adptw_instance(&specs, 1, &rows, 1, 1)
}

#[test]
fn can_insert_station_into_infeasible_sequence() {
    let instance = create_test_instance();
    // The direct tour consumes 24 charge units against a battery of 20.
    let propagator = AdptwPropagator::new(instance.clone(), 20);
    let mut frvcp = Frvcp::new(instance, propagator);

    let optimized = frvcp.optimize(&[0, 1, 2, 0]);

    assert_eq!(optimized, vec![0, 1, 3, 2, 0]);
}

#[test]
fn can_keep_sequence_when_battery_suffices() {
    let instance = create_test_instance();
    let propagator = AdptwPropagator::new(instance.clone(), 30);
    let mut frvcp = Frvcp::new(instance, propagator);

    let optimized = frvcp.optimize(&[0, 1, 2, 0]);

    assert_eq!(optimized, vec![0, 1, 2, 0]);
}

#[test]
fn can_return_sequence_unchanged_when_no_embedding_is_feasible() {
    let instance = create_test_instance();
    // No single leg fits the battery, so the queue drains without a final label.
    let propagator = AdptwPropagator::new(instance.clone(), 3);
    let mut frvcp = Frvcp::new(instance, propagator);

    let optimized = frvcp.optimize(&[0, 1, 2, 0]);

    assert_eq!(optimized, vec![0, 1, 2, 0]);
}

#[test]
fn can_drop_and_reinsert_stations_from_the_input() {
    let instance = create_test_instance();
    let propagator = AdptwPropagator::new(instance.clone(), 30);
    let mut frvcp = Frvcp::new(instance, propagator);

    // Stations in the input are dropped; with a large battery none is re-inserted.
    let optimized = frvcp.optimize(&[0, 1, 3, 2, 0]);

    assert_eq!(optimized, vec![0, 1, 2, 0]);
}

#[test]
fn can_run_repeatedly_on_the_same_solver() {
    let instance = create_test_instance();
    let propagator = AdptwPropagator::new(instance.clone(), 20);
    let mut frvcp = Frvcp::new(instance, propagator);

    assert_eq!(frvcp.optimize(&[0, 1, 2, 0]), vec![0, 1, 3, 2, 0]);
    assert_eq!(frvcp.optimize(&[0, 2, 1, 0]), vec![0, 2, 3, 1, 0]);
    assert_eq!(frvcp.optimize(&[0, 1, 0]), vec![0, 1, 0]);
}

#[test]
#[should_panic]
fn cannot_optimize_sequence_without_depot_sentinels() {
    let instance = create_test_instance();
    let propagator = AdptwPropagator::new(instance.clone(), 20);
    let mut frvcp = Frvcp::new(instance, propagator);

    frvcp.optimize(&[1, 2]);
}

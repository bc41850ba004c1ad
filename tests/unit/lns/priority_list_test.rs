use super::*;
use crate::utils::DefaultRandom;

fn create_list(smoothing_factor: f64) -> AdaptivePriorityList<&'static str> {
    AdaptivePriorityList::new(Arc::new(DefaultRandom::new_with_seed(13)), smoothing_factor)
}

#[test]
fn can_assign_average_weight_to_new_entries() {
    let mut list = create_list(0.5);

    list.add("first");
    list.update(0, 9.);
    list.adapt();
    // weight = 0.5 * 9 + 0.5 * 1 = 5
    assert_eq!(list.weight(0), 5.);

    list.add("second");
    assert_eq!(list.weight(1), 5.);
}

#[test]
fn can_adapt_weights_from_period_scores() {
    let mut list = create_list(0.4);
    list.add("first");
    list.add("second");

    list.update(0, 10.);
    list.update(0, 20.);
    list.update(1, 4.);
    list.adapt();

    // first: 0.4 * (30 / 2) + 0.6 * 1 = 6.6; second: 0.4 * 4 + 0.6 * 1 = 2.2
    assert!((list.weight(0) - 6.6).abs() < 1e-9);
    assert!((list.weight(1) - 2.2).abs() < 1e-9);

    // The period counters were reset, so another adaptation only decays.
    list.adapt();
    assert!((list.weight(0) - 0.6 * 6.6).abs() < 1e-9);
}

#[test]
fn can_reset_weights() {
    let mut list = create_list(0.5);
    list.add("first");
    list.add("second");
    list.update(0, 10.);
    list.adapt();

    list.reset_weights();

    assert_eq!(list.weight(0), 1.);
    assert_eq!(list.weight(1), 1.);
}

#[test]
fn can_pick_by_roulette() {
    let mut list = create_list(1.);
    list.add("never");
    list.add("always");

    list.update(1, 100.);
    list.update(0, 0.);
    list.adapt();

    for _ in 0..100 {
        assert_eq!(list.pick(), 1);
    }
}

#[test]
fn can_remove_entries() {
    let mut list = create_list(0.5);
    list.add("first");
    list.add("second");

    list.remove(0);

    assert_eq!(list.len(), 1);
    assert_eq!(*list.get(0), "second");
}

#[test]
#[should_panic]
fn cannot_pick_from_empty_list() {
    let list = create_list(0.5);

    list.pick();
}

use super::*;

#[test]
fn can_reproduce_sequence_with_same_seed() {
    let first = DefaultRandom::new_with_seed(42);
    let second = DefaultRandom::new_with_seed(42);

    let first_values: Vec<i64> = (0..100).map(|_| first.uniform_int(0, 1000)).collect();
    let second_values: Vec<i64> = (0..100).map(|_| second.uniform_int(0, 1000)).collect();

    assert_eq!(first_values, second_values);
}

#[test]
fn can_produce_different_sequences_with_different_seeds() {
    let first = DefaultRandom::new_with_seed(1);
    let second = DefaultRandom::new_with_seed(2);

    let first_values: Vec<i64> = (0..100).map(|_| first.uniform_int(0, 1000)).collect();
    let second_values: Vec<i64> = (0..100).map(|_| second.uniform_int(0, 1000)).collect();

    assert_ne!(first_values, second_values);
}

#[test]
fn can_generate_in_range() {
    let random = DefaultRandom::default();

    for _ in 0..1000 {
        let value = random.uniform_int(3, 7);
        assert!((3..=7).contains(&value));

        let value = random.uniform_real(0.5, 1.5);
        assert!((0.5..1.5).contains(&value));
    }
}

#[test]
fn can_handle_degenerate_ranges() {
    let random = DefaultRandom::default();

    assert_eq!(random.uniform_int(5, 5), 5);
    assert_eq!(random.uniform_real(2., 2.), 2.);
}

#[test]
fn can_pick_weighted_index() {
    let random = DefaultRandom::new_with_seed(7);

    for _ in 0..100 {
        assert_eq!(random.weighted(&[0., 1., 0.]), 1);
    }
}

#[test]
fn can_pick_any_index_when_all_weights_are_zero() {
    let random = DefaultRandom::new_with_seed(7);

    for _ in 0..100 {
        assert!(random.weighted(&[0., 0., 0.]) < 3);
    }
}

#[test]
fn can_choose_item_from_slice() {
    let random = DefaultRandom::new_with_seed(3);
    let items = [10, 20, 30];

    for _ in 0..100 {
        assert!(items.contains(choose(&random, &items)));
    }
}

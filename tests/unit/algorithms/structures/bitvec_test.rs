use super::*;

#[test]
fn can_set_and_get_bits() {
    let mut bits = BitVec::new(20);

    bits.set(0, true);
    bits.set(13, true);

    assert!(bits.test(0));
    assert!(!bits.test(1));
    assert!(bits.test(13));
    assert_eq!(bits.get(20), None);
    assert_eq!(bits.len(), 20);
}

#[test]
fn can_fill_and_reset() {
    let mut bits = BitVec::new(10);

    bits.fill(true);
    assert!((0..10).all(|index| bits.test(index)));

    bits.reset();
    assert!((0..10).all(|index| !bits.test(index)));
}

#[test]
fn can_iterate_over_set_bits() {
    let mut bits = BitVec::new(16);
    bits.set(1, true);
    bits.set(8, true);
    bits.set(15, true);

    assert_eq!(bits.iter_ones().collect::<Vec<_>>(), vec![1, 8, 15]);
}

#[test]
fn can_unset_bits() {
    let mut bits = BitVec::new(8);
    bits.set(3, true);
    bits.set(3, false);

    assert!(!bits.test(3));
    assert_eq!(bits.iter_ones().count(), 0);
}

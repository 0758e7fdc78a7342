//! Integration tests for index remapping
//!
//! Tests dense and sparse translation tables.

use dimtable_foundation::{ErrorKind, NOT_FOUND, RemapStrategy, Remapper};
use proptest::prelude::*;

#[test]
fn strategies_agree() {
    let old = [4, 0, 9, 2];
    let new = [0, 1, 2, 3];
    let dense = Remapper::new(&old, &new, RemapStrategy::Dense).unwrap();
    let sparse = Remapper::new(&old, &new, RemapStrategy::Sparse).unwrap();
    for v in 0..12 {
        assert_eq!(dense.translate(v), sparse.translate(v));
    }
    assert_eq!(dense.translate(9), 2);
    assert_eq!(sparse.translate(5), NOT_FOUND);
}

#[test]
fn domains_must_have_equal_length() {
    let err = Remapper::new(&[0, 1], &[0], RemapStrategy::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SizeMismatch { .. }));
}

proptest! {
    #[test]
    fn permutation_round_trips(order in Just((0..30usize).collect::<Vec<_>>()).prop_shuffle()) {
        let identity: Vec<usize> = (0..order.len()).collect();
        let forward = Remapper::new(&order, &identity, RemapStrategy::default()).unwrap();
        let backward = Remapper::new(&identity, &order, RemapStrategy::default()).unwrap();
        let mut values = identity.clone();
        forward.apply(&mut values);
        backward.apply(&mut values);
        prop_assert_eq!(values, identity);
    }
}

//! Integration tests for row selections
//!
//! Tests index lists, masks, ranges and their resolution.

use dimtable_foundation::{ErrorKind, Selection};

#[test]
fn indices_keep_order() {
    let s = Selection::from(vec![3, 1, 3]);
    assert_eq!(s.resolve(4).unwrap(), vec![3, 1, 3]);
    assert_eq!(s.resolve_sorted(4).unwrap(), vec![1, 3]);
}

#[test]
fn mask_resolves_ascending() {
    let s = Selection::from(vec![true, false, true]);
    assert_eq!(s.resolve(3).unwrap(), vec![0, 2]);
}

#[test]
fn range_selection() {
    let s = Selection::from(1..3);
    assert_eq!(s.to_mask(4).unwrap(), vec![false, true, true, false]);
}

#[test]
fn all_selects_everything() {
    assert_eq!(Selection::all(3).resolve(3).unwrap(), vec![0, 1, 2]);
}

#[test]
fn out_of_bounds_index() {
    let err = Selection::from([0, 5]).resolve(5).unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::IndexOutOfBounds {
            index: 5,
            length: 5
        }
    ));
}

#[test]
fn mask_length_must_match() {
    let err = Selection::from(vec![true]).resolve(2).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidSelection(_)));
}

//! Integration tests for growing and shrinking dimensions
//!
//! Tests default rows, required inputs, index domain updates, and the
//! expand/shrink round trip.

use dimtable_foundation::{ErrorKind, Value};
use dimtable_storage::Expansion;
use proptest::prelude::*;

use crate::common::{grouped, layout, strings};

// =============================================================================
// Expansion
// =============================================================================

#[test]
fn expanding_rows_fills_defaults() {
    let mut store = grouped();
    store
        .expand_dimension(10, "x", Expansion::new().with_map("g", vec![0, 0, 1, 1, 1, 2, 2, 2, 2, 2]))
        .unwrap();
    assert_eq!(store.dimension("x").unwrap(), 10);
    assert_eq!(strings(&store, "type_array")[8..], ["", ""]);
    assert_eq!(
        store.attribute("r_array").unwrap().get(29),
        Some(Value::Float(0.0))
    );
    assert_eq!(store.relation("links").unwrap().index().len(), 10);
    store.check_integrity().unwrap();

    // New rows can be linked straight away.
    store
        .set_relation("links", vec![0, 1, 2, 3, 2, 4, 5, 6, 8, 9])
        .unwrap();
}

#[test]
fn expanding_links_needs_values_and_groups() {
    let mut store = grouped();
    let err = store
        .expand_dimension(6, "y", Expansion::new().with_map("g", vec![0, 1, 1, 2, 2, 2]))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingInput(_)));

    let err = store
        .expand_dimension(
            6,
            "y",
            Expansion::new().with_relation("links", vec![0, 1, 2, 3, 2, 4, 5, 6, 5, 7, 6, 7]),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingInput(_)));
    assert_eq!(store, grouped());

    store
        .expand_dimension(
            6,
            "y",
            Expansion::new()
                .with_relation("links", vec![0, 1, 2, 3, 2, 4, 5, 6, 5, 7, 6, 7])
                .with_map("g", vec![0, 1, 1, 2, 2, 2]),
        )
        .unwrap();
    assert_eq!(store.relation("links").unwrap().row(5), &[6, 7]);
    assert_eq!(store.map("y", "g").unwrap().values()[5], 2);
}

#[test]
fn expansion_values_must_resolve() {
    let mut store = grouped();
    let err = store
        .expand_dimension(
            6,
            "y",
            Expansion::new()
                .with_relation("links", vec![0, 1, 2, 3, 2, 4, 5, 6, 5, 7, 6, 8])
                .with_map("g", vec![0, 1, 1, 2, 2, 2]),
        )
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::DanglingReference { value: 8, .. }
    ));
    assert_eq!(store, grouped());
}

#[test]
fn unused_inputs_are_rejected() {
    let mut store = grouped();
    let err = store
        .expand_dimension(
            4,
            "g",
            Expansion::new().with_relation("links", vec![0, 1]),
        )
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownColumn(_)));
}

#[test]
fn expanding_groups_extends_map_domain() {
    let mut store = grouped();
    store.expand_dimension(4, "g", Expansion::new()).unwrap();
    assert_eq!(strings(&store, "label")[3], "");
    store
        .set_map("x", "g", vec![0, 0, 1, 1, 1, 2, 2, 3])
        .unwrap();
    store.check_integrity().unwrap();
}

#[test]
fn expansion_cannot_shrink() {
    let err = grouped()
        .expand_dimension(2, "g", Expansion::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SizeMismatch { .. }));
}

// =============================================================================
// Shrinking
// =============================================================================

#[test]
fn shrinking_rows_drops_their_links() {
    let mut store = grouped();
    store.shrink_dimension(5, "x").unwrap();
    assert_eq!(store.dimension("x").unwrap(), 5);
    assert_eq!(store.dimension("g").unwrap(), 3);
    assert_eq!(store.relation("links").unwrap().values(), &[0, 1, 2, 3, 2, 4]);
    assert_eq!(store.map("x", "g").unwrap().values(), &[0, 0, 1, 1, 1]);
    assert_eq!(store.map("y", "g").unwrap().values(), &[0, 1, 1]);
    store.check_integrity().unwrap();
}

#[test]
fn shrinking_links_leaves_rows() {
    let mut store = grouped();
    store.shrink_dimension(5, "y").unwrap();
    assert_eq!(store, grouped());

    store.shrink_dimension(2, "y").unwrap();
    assert_eq!(store.dimension("x").unwrap(), 8);
    assert_eq!(store.relation("links").unwrap().values(), &[0, 1, 2, 3]);
    assert_eq!(store.map("y", "g").unwrap().values(), &[0, 1]);
}

#[test]
fn shrinking_groups_with_children_fails() {
    let mut store = grouped();
    let err = store.shrink_dimension(2, "g").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DanglingReference { .. }));
    assert_eq!(store, grouped());
}

#[test]
fn shrinking_cannot_grow() {
    let err = grouped().shrink_dimension(9, "x").unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SizeMismatch { .. }));
}

proptest! {
    #[test]
    fn expand_then_shrink_restores(layout in layout(), extra in 1usize..4) {
        let original = layout.build();
        let n = original.dimension("x").unwrap();
        let mut map = original.map("x", "g").unwrap().values().to_vec();
        map.extend(std::iter::repeat_n(0, extra));

        let mut store = original.clone();
        store
            .expand_dimension(n + extra, "x", Expansion::new().with_map("g", map))
            .unwrap();
        prop_assert!(store.check_integrity().is_ok());
        store.shrink_dimension(n, "x").unwrap();
        prop_assert_eq!(store, original);
    }
}

//! Integration tests for predicate queries
//!
//! Tests equality and membership predicates, index and mask predicates,
//! and their cascade through the store.

use dimtable_foundation::{ErrorKind, Selection};
use dimtable_storage::{Predicate, Query};

use crate::common::{grouped, strings};

#[test]
fn select_by_type() {
    let store = grouped().select(&Query::new().is_in("type_array", ["A", "B", "F"])).unwrap();
    assert_eq!(strings(&store, "type_array"), vec!["A", "B", "F"]);
    assert_eq!(strings(&store, "label"), vec!["g0", "g2"]);
    assert_eq!(store.relation("links").unwrap().values(), &[0, 1]);
    store.check_integrity().unwrap();
}

#[test]
fn select_by_group_label() {
    let store = grouped().select(&Query::new().equals("label", "g1")).unwrap();
    assert_eq!(strings(&store, "type_array"), vec!["C", "D", "E"]);
    assert_eq!(store.relation("links").unwrap().values(), &[0, 1, 0, 2]);
}

#[test]
fn predicates_on_different_dimensions_combine() {
    let store = grouped()
        .select(
            &Query::new()
                .equals("label", "g2")
                .index("x", 0..6),
        )
        .unwrap();
    assert_eq!(strings(&store, "type_array"), vec!["F"]);
    assert_eq!(store.dimension("y").unwrap(), 0);
}

#[test]
fn mask_predicate() {
    let near: Vec<bool> = (0..8).map(|i| i % 2 == 0).collect();
    let masks = Query::new().mask("x", near.clone()).evaluate(&grouped()).unwrap();
    assert_eq!(masks["x"], near);
}

#[test]
fn predicates_are_recorded_in_order() {
    let query = Query::new().equals("type_array", "A").index("g", [0]);
    assert!(matches!(query.predicates()[0], Predicate::Equals { .. }));
    assert_eq!(
        query.predicates()[1],
        Predicate::Index {
            dimension: "g".into(),
            selection: Selection::from([0]),
        }
    );
}

#[test]
fn unknown_attribute_is_rejected() {
    let err = grouped()
        .select(&Query::new().equals("mass", 1.0))
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownColumn(_)));
}

#[test]
fn no_match_empties_the_store() {
    let store = grouped().select(&Query::new().equals("type_array", "Z")).unwrap();
    assert!(store.is_empty());
}

//! Integration tests for aggregation and concatenation
//!
//! Tests building a store from child records, appending stores, batches,
//! and extracting child records back out.

use dimtable_foundation::{Array, Error, ErrorKind, Value};
use dimtable_storage::{Arrays, EntityStore};
use proptest::prelude::*;

use crate::common::{grouped, grouped_schema, layout, member_schema, strings};

/// One record of the `g` dimension of [`grouped`].
fn member(index: usize) -> EntityStore {
    let (types, links, offset): (Vec<&str>, Vec<usize>, usize) = match index {
        0 => (vec!["A", "B"], vec![0, 1], 0),
        1 => (vec!["C", "D", "E"], vec![0, 1, 0, 2], 2),
        _ => (vec!["F", "G", "H"], vec![0, 1, 0, 2], 5),
    };
    let coords: Vec<[f64; 3]> = (0..types.len())
        .map(|i| [f64::from(u32::try_from(offset + i).unwrap()), 0.0, 0.0])
        .collect();
    let mut store = EntityStore::from_arrays(
        member_schema(),
        Arrays::new()
            .with_attribute("type_array", Array::scalars(types))
            .with_attribute("r_array", Array::float_rows(&coords))
            .with_relation("links", links),
    )
    .unwrap();
    store
        .set_field("label", Array::scalars(vec![format!("g{index}")]))
        .unwrap();
    store
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn aggregating_members_rebuilds_groups() {
    let members = [member(0), member(1), member(2)];
    let store = EntityStore::from_entities(grouped_schema(), &members, "g").unwrap();
    assert_eq!(store, grouped());
}

#[test]
fn aggregating_nothing_gives_empty_store() {
    let store = EntityStore::from_entities(grouped_schema(), &[], "g").unwrap();
    assert!(store.is_empty());
    store.check_integrity().unwrap();
}

#[test]
fn mixed_schemas_cannot_aggregate() {
    let err = EntityStore::from_entities(grouped_schema(), &[member(0), grouped()], "g")
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
}

#[test]
fn subentity_extracts_member() {
    let store = grouped();
    for i in 0..3 {
        assert_eq!(store.subentity(member_schema(), i).unwrap(), member(i));
    }
    let err = store.subentity(member_schema(), 3).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::IndexOutOfBounds { index: 3, .. }));
}

// =============================================================================
// Concatenation
// =============================================================================

#[test]
fn concat_offsets_values() {
    let both = grouped().concat(&grouped()).unwrap();
    assert_eq!(both.dimension("x").unwrap(), 16);
    assert_eq!(both.dimension("g").unwrap(), 6);
    assert_eq!(
        &both.relation("links").unwrap().values()[10..],
        &[8, 9, 10, 11, 10, 12, 13, 14, 13, 15]
    );
    assert_eq!(
        &both.map("x", "g").unwrap().values()[8..],
        &[3, 3, 4, 4, 4, 5, 5, 5]
    );
    assert_eq!(strings(&both, "label"), vec!["g0", "g1", "g2", "g0", "g1", "g2"]);
    both.check_integrity().unwrap();
}

#[test]
fn concat_onto_empty_copies() {
    let empty = EntityStore::new(grouped_schema());
    assert_eq!(empty.concat(&grouped()).unwrap(), grouped());
    assert_eq!(grouped().concat(&empty).unwrap(), grouped());
}

#[test]
fn concat_onto_empty_keeps_own_fields() {
    let mut empty = EntityStore::new(grouped_schema());
    empty.set_field("name", Array::scalars(vec!["target"])).unwrap();
    let mut source = grouped();
    source.set_field("name", Array::scalars(vec!["source"])).unwrap();

    let joined = empty.concat(&source).unwrap();
    assert_eq!(joined.dimension("x").unwrap(), 8);
    assert_eq!(joined.field("name").unwrap().scalar(), Some(Value::from("target")));
}

#[test]
fn concat_requires_same_schema() {
    let err = grouped().concat(&member(0)).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
}

// =============================================================================
// Batches
// =============================================================================

#[test]
fn batch_appends_once() {
    let mut store = EntityStore::new(grouped_schema());
    store
        .batch(|batch| {
            for i in 0..3 {
                batch.append(member(i));
            }
            assert_eq!(batch.len(), 3);
            Ok(())
        })
        .unwrap();
    assert_eq!(store, grouped());

    store.add_entity(member(0)).unwrap();
    assert_eq!(store.dimension("g").unwrap(), 4);
    assert_eq!(store.map("x", "g").unwrap().values()[8..], [3, 3]);
}

#[test]
fn failed_batch_appends_nothing() {
    let mut store = grouped();
    let err = store
        .batch(|batch| {
            batch.append(member(0));
            Err(Error::new(ErrorKind::Internal("cancelled".into())))
        })
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Internal(_)));
    assert_eq!(store, grouped());
}

proptest! {
    #[test]
    fn concat_adds_sizes(a in layout(), b in layout()) {
        let (left, right) = (a.build(), b.build());
        let both = left.concat(&right).unwrap();
        prop_assert!(both.check_integrity().is_ok());
        for dim in ["x", "y", "g"] {
            prop_assert_eq!(
                both.dimension(dim).unwrap(),
                left.dimension(dim).unwrap() + right.dimension(dim).unwrap()
            );
        }
        let offset = left.dimension("x").unwrap();
        let tail: Vec<usize> = both.relation("links").unwrap().values()[left.relation("links").unwrap().values().len()..].to_vec();
        let shifted: Vec<usize> = right.relation("links").unwrap().values().iter().map(|v| v + offset).collect();
        prop_assert_eq!(tail, shifted);

        // The left half is untouched.
        let head = both.sub_dimension(0..left.dimension("g").unwrap(), "g", true).unwrap();
        prop_assert_eq!(head.dimension("x").unwrap(), left.dimension("x").unwrap());
    }
}

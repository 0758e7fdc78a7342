//! Integration tests for cascading selection
//!
//! Tests propagation across relations and maps, non-propagating
//! selection, and invariants over random stores.

use dimtable_foundation::{ErrorKind, Selection};
use dimtable_storage::StoreConfig;
use proptest::prelude::*;

use crate::common::{grouped, layout, strings};

// =============================================================================
// Propagation
// =============================================================================

#[test]
fn selecting_groups_keeps_their_rows_and_links() {
    let sub = grouped().sub_dimension(vec![0, 2], "g", true).unwrap();
    assert_eq!(sub.dimension("g").unwrap(), 2);
    assert_eq!(strings(&sub, "type_array"), vec!["A", "B", "F", "G", "H"]);
    assert_eq!(strings(&sub, "label"), vec!["g0", "g2"]);
    assert_eq!(sub.relation("links").unwrap().values(), &[0, 1, 2, 3, 2, 4]);
    assert_eq!(sub.map("x", "g").unwrap().values(), &[0, 0, 1, 1, 1]);
    assert_eq!(sub.map("y", "g").unwrap().values(), &[0, 1, 1]);
    sub.check_integrity().unwrap();
}

#[test]
fn selecting_links_keeps_everything_they_need() {
    let rows = grouped().propagate(vec![1], "y").unwrap();
    assert_eq!(rows["y"], vec![1]);
    assert_eq!(rows["g"], vec![1]);
    assert_eq!(rows["x"], vec![2, 3, 4]);
}

#[test]
fn upward_propagation_drops_unlinked_rows() {
    let store = grouped().with_config(StoreConfig::default().with_upward_propagation(true));
    let rows = store.propagate(vec![1], "y").unwrap();
    assert_eq!(rows["x"], vec![2, 3]);
    assert_eq!(rows["g"], vec![1]);
}

#[test]
fn propagate_reports_every_dimension() {
    let rows = grouped().propagate(Selection::all(8), "x").unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows["y"], vec![0, 1, 2, 3, 4]);
}

#[test]
fn selection_order_does_not_reorder_rows() {
    let sub = grouped().sub_dimension(vec![4, 2, 3], "x", true).unwrap();
    assert_eq!(strings(&sub, "type_array"), vec!["C", "D", "E"]);
}

#[test]
fn empty_selection_empties_connected_dimensions() {
    let sub = grouped().sub_dimension(Vec::<usize>::new(), "g", true).unwrap();
    assert!(sub.is_empty());
    assert_eq!(sub.dimension("x").unwrap(), 0);
    assert_eq!(sub.dimension("y").unwrap(), 0);
    sub.check_integrity().unwrap();
}

// =============================================================================
// Without Propagation
// =============================================================================

#[test]
fn non_propagating_selection_leaves_groups() {
    let sub = grouped().sub_dimension(vec![2, 3, 4], "x", false).unwrap();
    assert_eq!(sub.dimension("g").unwrap(), 3);
    assert_eq!(strings(&sub, "label"), vec!["g0", "g1", "g2"]);
    assert_eq!(sub.dimension("y").unwrap(), 2);
    assert_eq!(sub.relation("links").unwrap().values(), &[0, 1, 0, 2]);
    sub.check_integrity().unwrap();
}

#[test]
fn non_propagating_group_removal_is_rejected() {
    let err = grouped().sub_dimension(vec![1, 2], "g", false).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DanglingReference { .. }));
}

#[test]
fn mask_of_wrong_length_is_rejected() {
    let err = grouped()
        .sub_dimension(vec![true, false], "x", true)
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidSelection(_)));
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn selection_keeps_integrity(
        (layout, mask) in layout().prop_flat_map(|l| {
            let n = l.rows();
            (Just(l), prop::collection::vec(any::<bool>(), n))
        })
    ) {
        let store = layout.build();
        let sub = store.sub_dimension(mask.clone(), "x", true).unwrap();
        prop_assert!(sub.check_integrity().is_ok());

        let kept = mask.iter().filter(|&&k| k).count();
        prop_assert_eq!(sub.dimension("x").unwrap(), kept);

        let surviving_links = layout
            .links
            .iter()
            .filter(|[a, b]| mask[*a] && mask[*b])
            .count();
        prop_assert_eq!(sub.dimension("y").unwrap(), surviving_links);

        let map = store.map("x", "g").unwrap().values();
        let mut groups: Vec<usize> = (0..mask.len()).filter(|&i| mask[i]).map(|i| map[i]).collect();
        groups.dedup();
        prop_assert_eq!(sub.dimension("g").unwrap(), groups.len());
    }

    #[test]
    fn selecting_everything_is_identity(layout in layout()) {
        let store = layout.build();
        let n = store.dimension("x").unwrap();
        let sub = store.sub_dimension(0..n, "x", true).unwrap();
        prop_assert_eq!(sub, store);
    }
}

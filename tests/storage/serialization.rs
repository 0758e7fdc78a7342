//! Integration tests for snapshots and the `MessagePack` codec
//!
//! Tests that stores round-trip through plain data and bytes.

use dimtable_foundation::{Array, ErrorKind, Value};
use dimtable_storage::codec::{from_bytes, to_bytes};
use dimtable_storage::{EntityStore, StoreConfig, StoreData};
use proptest::prelude::*;

use crate::common::{grouped, grouped_schema, layout, member_schema};

#[test]
fn snapshot_holds_plain_data() {
    let data = grouped().to_serializable();
    assert_eq!(data.schema, "grouped");
    assert_eq!(data.dimensions["g"], 3);
    assert_eq!(data.relations["links"].len(), 10);
    assert_eq!(data.attributes["label"].rows(), 3);
    assert_eq!(data.maps.len(), 2);
}

#[test]
fn snapshot_round_trip_keeps_fields() {
    let mut store = grouped();
    store.set_field("name", Array::scalars(vec!["demo"])).unwrap();
    let restored = EntityStore::from_serializable(grouped_schema(), store.to_serializable()).unwrap();
    assert_eq!(restored.field("name").unwrap().scalar(), Some(Value::from("demo")));
    assert_eq!(restored, store);
}

#[test]
fn snapshot_for_other_schema_is_rejected() {
    let err = EntityStore::from_serializable(member_schema(), grouped().to_serializable())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Schema(_)));
}

#[test]
fn snapshot_with_bad_map_is_rejected() {
    let mut data: StoreData = grouped().to_serializable();
    data.maps[0].values[0] = 3;
    assert!(EntityStore::from_serializable(grouped_schema(), data).is_err());
}

#[test]
fn bytes_round_trip() {
    let store = grouped();
    let bytes = to_bytes(&store).unwrap();
    assert_eq!(from_bytes(grouped_schema(), &bytes).unwrap(), store);
}

#[test]
fn bytes_round_trip_keeps_config() {
    let store = grouped().with_config(StoreConfig::sparse());
    let restored = from_bytes(grouped_schema(), &to_bytes(&store).unwrap()).unwrap();
    assert_eq!(restored.config(), &StoreConfig::sparse());
    assert_eq!(restored, store);
}

#[test]
fn truncated_bytes_are_rejected() {
    let bytes = to_bytes(&grouped()).unwrap();
    let err = from_bytes(grouped_schema(), &bytes[..bytes.len() / 2]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SerializationError(_)));
}

proptest! {
    #[test]
    fn random_stores_round_trip(layout in layout()) {
        let store = layout.build();
        let bytes = to_bytes(&store).unwrap();
        prop_assert_eq!(from_bytes(grouped_schema(), &bytes).unwrap(), store);
    }
}

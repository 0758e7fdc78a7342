//! Store encoding using `MessagePack`.
//!
//! Stores are encoded through their [`StoreData`] snapshot with named
//! fields, so the schema is needed again to decode.

use std::sync::Arc;

use dimtable_foundation::{Error, ErrorKind, Result};

use crate::schema::Schema;
use crate::snapshot::StoreData;
use crate::store::EntityStore;

/// Encodes a store as `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_bytes(store: &EntityStore) -> Result<Vec<u8>> {
    rmp_serde::to_vec_named(&store.to_serializable())
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))
}

/// Decodes a store of `schema` from `MessagePack` bytes.
///
/// # Errors
///
/// Returns an error if the bytes are not a valid snapshot or the snapshot
/// does not satisfy the schema.
pub fn from_bytes(schema: Arc<Schema>, bytes: &[u8]) -> Result<EntityStore> {
    let data: StoreData = rmp_serde::from_slice(bytes)
        .map_err(|e| Error::new(ErrorKind::SerializationError(e.to_string())))?;
    EntityStore::from_serializable(schema, data)
}

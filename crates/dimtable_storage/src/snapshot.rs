//! Plain snapshots of a store for serialization.
//!
//! A [`StoreData`] holds only data: dimension sizes, column arrays, the
//! map table and the store's configuration. Column declarations come from
//! the schema handed back to [`EntityStore::from_serializable`].

use std::collections::BTreeMap;
use std::sync::Arc;

use dimtable_foundation::{Array, Error, ErrorContext, Result};
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::config::StoreConfig;
use crate::construct::Arrays;
use crate::schema::Schema;
use crate::store::{EntityStore, MapKey};

/// One map in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapData {
    /// Child dimension.
    pub child: String,
    /// Group dimension.
    pub group: String,
    /// Group row of each child row.
    pub values: Vec<usize>,
}

/// Everything needed to rebuild an identical store from its schema.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoreData {
    /// Name of the record type the data belongs to.
    pub schema: String,
    /// Size of every dimension.
    pub dimensions: BTreeMap<String, usize>,
    /// Rows of every populated attribute.
    pub attributes: BTreeMap<String, Array>,
    /// Flat values of every populated relation.
    pub relations: BTreeMap<String, Vec<usize>>,
    /// Value of every field.
    pub fields: BTreeMap<String, Array>,
    /// Every map.
    pub maps: Vec<MapData>,
    /// Configuration the store was running with.
    pub config: StoreConfig,
}

impl EntityStore {
    /// Captures the store's data.
    #[must_use]
    pub fn to_serializable(&self) -> StoreData {
        let mut data = StoreData {
            schema: self.schema.name().to_string(),
            dimensions: self.dimensions().map(|(d, n)| (d.to_string(), n)).collect(),
            attributes: BTreeMap::new(),
            relations: BTreeMap::new(),
            fields: BTreeMap::new(),
            maps: Vec::new(),
            config: self.config,
        };
        for column in self.columns() {
            match column {
                Column::Attribute(a) => {
                    if let Some(values) = a.values() {
                        data.attributes.insert(a.name().to_string(), values.clone());
                    }
                }
                Column::Relation(r) => {
                    if r.is_populated() {
                        data.relations.insert(r.name().to_string(), r.values().to_vec());
                    }
                }
                Column::Field(f) => {
                    data.fields.insert(f.name().to_string(), f.value().clone());
                }
            }
        }
        data.maps = self
            .maps()
            .map(|(key, map)| MapData {
                child: key.child.clone(),
                group: key.group.clone(),
                values: map.values().to_vec(),
            })
            .collect();
        data
    }

    /// Rebuilds a store from a snapshot taken with
    /// [`EntityStore::to_serializable`].
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot belongs to another record type or
    /// does not satisfy the schema.
    pub fn from_serializable(schema: Arc<Schema>, data: StoreData) -> Result<Self> {
        let ctx = || ErrorContext::new("from_serializable");
        if data.schema != schema.name() {
            return Err(Error::schema(format!(
                "snapshot of {} cannot be loaded as {}",
                data.schema,
                schema.name()
            ))
            .with_context(ctx()));
        }

        let mut store = Self::allocate(schema, &data.dimensions)
            .map_err(|e| e.with_context(ctx()))?
            .with_config(data.config);
        let inputs = Arrays {
            attributes: data.attributes.into_iter().collect(),
            relations: data.relations.into_iter().collect(),
            fields: data.fields.into_iter().collect(),
            maps: data
                .maps
                .into_iter()
                .map(|m| (MapKey::new(m.child, m.group), m.values))
                .collect(),
        };
        store.assign(inputs).map_err(|e| e.with_context(ctx()))?;

        debug!("from_serializable: loaded {} store", store.schema.name());
        Ok(store)
    }
}

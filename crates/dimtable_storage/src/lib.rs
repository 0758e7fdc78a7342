//! Schema declarations, instance columns, and the entity store for Dimtable.
//!
//! This crate provides:
//! - [`Schema`] - Immutable record type declarations shared behind an `Arc`
//! - [`Column`] - Attribute, relation and field instance columns
//! - [`EntityStore`] - Dimensions, columns and maps for one record instance
//! - [`Query`] - Predicates evaluated into cascading selections
//! - [`StoreData`] - A plain snapshot for serialization
//!
//! Every bulk operation (selection, reorder, resize, concatenation,
//! aggregation) keeps relation values inside their index domains and map
//! values inside their group dimensions.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aggregate;
pub mod batch;
#[cfg(feature = "serde")]
pub mod codec;
pub mod column;
pub mod config;
pub mod construct;
pub mod query;
pub mod reorder;
pub mod resize;
pub mod schema;
pub mod select;
pub mod snapshot;
pub mod store;

pub use batch::Batch;
pub use column::{AttributeColumn, Column, FieldColumn, RelationColumn};
pub use config::StoreConfig;
pub use construct::Arrays;
pub use query::{Predicate, Query};
pub use resize::Expansion;
pub use schema::{AttributeSchema, ColumnKind, FieldSchema, RelationSchema, Schema};
pub use snapshot::{MapData, StoreData};
pub use store::{EntityStore, MapKey};

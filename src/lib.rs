//! Dimtable - Schema-declared multi-dimensional columnar entity store
//!
//! This crate re-exports all layers of the Dimtable system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: dimtable_records    - Atom, molecule and system record types
//! Layer 1: dimtable_storage    - Schemas, columns, entity store, queries, codec
//! Layer 0: dimtable_foundation - Core types (Array, Value, Selection, Remapper, Error)
//! ```

pub use dimtable_foundation as foundation;
pub use dimtable_records as records;
pub use dimtable_storage as storage;

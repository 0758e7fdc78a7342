//! Atom, molecule and system record types for Dimtable.
//!
//! This crate provides:
//! - [`schema`] - Declarations of the atom, molecule and system record types
//! - [`construct`] - Typed constructors and counters for those records
//!
//! Records are plain [`dimtable_storage::EntityStore`]s. Atoms aggregate
//! into molecules along the atom dimension, and molecules into systems
//! along the molecule dimension.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod construct;
pub mod schema;

pub use construct::{
    atom, atom_types, molecule, n_atoms, n_bonds, n_molecules, named_molecule, set_box_vectors,
    system,
};
pub use schema::{ATOM, BOND, MOLECULE, SYSTEM};

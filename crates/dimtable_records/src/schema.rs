//! Schemas for the particle, group and collection record types.

use std::sync::Arc;

use dimtable_foundation::{ElementType, Result};
use dimtable_storage::{AttributeSchema, FieldSchema, RelationSchema, Schema};

/// Dimension of atoms.
pub const ATOM: &str = "atom";
/// Dimension of bonds between atoms.
pub const BOND: &str = "bond";
/// Dimension of molecules.
pub const MOLECULE: &str = "molecule";
/// Dimension a system occupies when aggregated.
pub const SYSTEM: &str = "system";

/// Per-atom attributes shared by molecules and systems.
fn with_atom_attributes(schema: Schema) -> Schema {
    schema
        .with_attribute(AttributeSchema::new("r_array", ATOM, ElementType::Float).with_shape([3]))
        .with_attribute(AttributeSchema::new("type_array", ATOM, ElementType::Str))
        .with_attribute(AttributeSchema::new("charge_array", ATOM, ElementType::Float))
        .with_attribute(AttributeSchema::new("atom_name", ATOM, ElementType::Str))
}

fn bonds() -> RelationSchema {
    RelationSchema::new("bonds", BOND, ATOM).with_shape([2])
}

/// A single atom: every value is a field.
///
/// # Errors
///
/// Never fails in practice; the declaration is validated like any other.
pub fn atom() -> Result<Arc<Schema>> {
    Schema::new("atom", ATOM)
        .with_field(FieldSchema::new("r_array", ElementType::Float).with_shape([3]))
        .with_field(FieldSchema::new("type_array", ElementType::Str))
        .with_field(FieldSchema::new("charge_array", ElementType::Float))
        .with_field(FieldSchema::new("atom_name", ElementType::Str))
        .build()
}

/// A molecule: atoms, bonds between them, and a name.
///
/// # Errors
///
/// Never fails in practice; the declaration is validated like any other.
pub fn molecule() -> Result<Arc<Schema>> {
    with_atom_attributes(Schema::new("molecule", MOLECULE))
        .with_relation(bonds())
        .with_field(FieldSchema::new("molecule_name", ElementType::Str))
        .build()
}

/// A system: atoms grouped into named molecules inside a periodic box.
///
/// # Errors
///
/// Never fails in practice; the declaration is validated like any other.
pub fn system() -> Result<Arc<Schema>> {
    with_atom_attributes(Schema::new("system", SYSTEM))
        .with_attribute(AttributeSchema::new("molecule_name", MOLECULE, ElementType::Str))
        .with_relation(bonds())
        .with_field(FieldSchema::new("box_vectors", ElementType::Float).with_shape([3, 3]))
        .build()
}

//! Typed constructors and counters for atoms, molecules and systems.

use dimtable_foundation::{Array, Result};
use dimtable_storage::{Arrays, EntityStore, Expansion};
use log::debug;

use crate::schema::{self, ATOM, BOND, MOLECULE};

/// Builds an atom of element `kind` at position `r`.
///
/// Charge starts at zero and the name empty.
///
/// # Errors
///
/// Returns an error only if the atom schema cannot be built.
pub fn atom(kind: &str, r: [f64; 3]) -> Result<EntityStore> {
    EntityStore::from_arrays(
        schema::atom()?,
        Arrays::new()
            .with_field("type_array", Array::scalars(vec![kind]))
            .with_field("r_array", Array::float_rows(&[r])),
    )
}

/// Builds a molecule from atoms and the atom pairs bonded together.
///
/// # Errors
///
/// Returns an error if an atom does not use the atom schema or a bond
/// references an atom that does not exist.
pub fn molecule(atoms: &[EntityStore], bonds: &[[usize; 2]]) -> Result<EntityStore> {
    let mut store = EntityStore::from_entities(schema::molecule()?, atoms, ATOM)?;
    if !bonds.is_empty() {
        let values = bonds.iter().flatten().copied().collect();
        store.expand_dimension(
            bonds.len(),
            BOND,
            Expansion::new().with_relation("bonds", values),
        )?;
    }
    Ok(store)
}

/// Like [`molecule`], also setting the molecule name.
///
/// # Errors
///
/// Same as [`molecule`].
pub fn named_molecule(
    name: &str,
    atoms: &[EntityStore],
    bonds: &[[usize; 2]],
) -> Result<EntityStore> {
    let mut store = molecule(atoms, bonds)?;
    store.set_field("molecule_name", Array::scalars(vec![name]))?;
    Ok(store)
}

/// Builds a system holding `molecules` in order.
///
/// # Errors
///
/// Returns an error if a molecule does not use the molecule schema.
pub fn system(molecules: &[EntityStore]) -> Result<EntityStore> {
    let mut store = EntityStore::new(schema::system()?);
    store.batch(|batch| {
        for molecule in molecules {
            batch.append(molecule.clone());
        }
        Ok(())
    })?;
    debug!(
        "system: {} molecule(s), {} atom(s)",
        n_molecules(&store),
        n_atoms(&store)
    );
    Ok(store)
}

/// Sets the periodic box of a system, one lattice vector per row.
///
/// # Errors
///
/// Returns an error if the store has no `box_vectors` field.
pub fn set_box_vectors(store: &mut EntityStore, vectors: [[f64; 3]; 3]) -> Result<()> {
    let flat: Vec<f64> = vectors.iter().flatten().copied().collect();
    store.set_field("box_vectors", Array::new(flat, [3, 3])?)
}

/// Returns the atoms' element types, in row order.
///
/// # Errors
///
/// Returns an error if the store has no per-atom `type_array`.
pub fn atom_types(store: &EntityStore) -> Result<Vec<String>> {
    let column = store.attribute("type_array")?;
    Ok(column
        .values()
        .and_then(Array::as_strs)
        .map(<[String]>::to_vec)
        .unwrap_or_default())
}

/// Number of atoms; zero for records without an atom dimension.
#[must_use]
pub fn n_atoms(store: &EntityStore) -> usize {
    store.dimension(ATOM).unwrap_or(0)
}

/// Number of molecules; zero for records without a molecule dimension.
#[must_use]
pub fn n_molecules(store: &EntityStore) -> usize {
    store.dimension(MOLECULE).unwrap_or(0)
}

/// Number of bonds; zero for records without a bond dimension.
#[must_use]
pub fn n_bonds(store: &EntityStore) -> usize {
    store.dimension(BOND).unwrap_or(0)
}

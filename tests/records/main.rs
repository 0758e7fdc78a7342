//! Integration tests for Layer 2: Records
//!
//! Tests building atoms, molecules and systems, and editing systems with
//! the storage operations.

use dimtable_foundation::{ErrorKind, Value};
use dimtable_records::{
    ATOM, BOND, MOLECULE, atom, atom_types, molecule, n_atoms, n_bonds, n_molecules,
    named_molecule, schema, set_box_vectors, system,
};
use dimtable_storage::codec::{from_bytes, to_bytes};
use dimtable_storage::{EntityStore, Query};

fn water() -> EntityStore {
    named_molecule(
        "water",
        &[
            atom("O", [0.0, 0.0, 0.0]).unwrap(),
            atom("H", [0.096, 0.0, 0.0]).unwrap(),
            atom("H", [-0.024, 0.093, 0.0]).unwrap(),
        ],
        &[[0, 1], [0, 2]],
    )
    .unwrap()
}

fn argon() -> EntityStore {
    named_molecule("argon", &[atom("Ar", [1.0, 1.0, 1.0]).unwrap()], &[]).unwrap()
}

fn solvated() -> EntityStore {
    system(&[water(), argon(), water()]).unwrap()
}

// =============================================================================
// Building Systems
// =============================================================================

#[test]
fn system_counts() {
    let s = solvated();
    assert_eq!(n_molecules(&s), 3);
    assert_eq!(n_atoms(&s), 7);
    assert_eq!(n_bonds(&s), 4);
    assert_eq!(
        s.map(ATOM, MOLECULE).unwrap().values(),
        &[0, 0, 0, 1, 2, 2, 2]
    );
    assert_eq!(s.relation("bonds").unwrap().values(), &[0, 1, 0, 2, 4, 5, 4, 6]);
    s.check_integrity().unwrap();
}

#[test]
fn system_can_grow_one_molecule_at_a_time() {
    let mut s = system(&[]).unwrap();
    assert!(s.is_empty());
    for m in [water(), argon(), water()] {
        s.add_entity(m).unwrap();
    }
    assert_eq!(s, solvated());
}

#[test]
fn atoms_cannot_join_a_system_directly() {
    let mut s = solvated();
    let err = s.add_entity(atom("Na", [0.0; 3]).unwrap()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownMap { .. }));
    assert_eq!(s, solvated());
}

// =============================================================================
// Editing Systems
// =============================================================================

#[test]
fn removing_solvent_by_query() {
    let s = solvated();
    let dry = s.select(&Query::new().equals("molecule_name", "argon")).unwrap();
    assert_eq!(n_molecules(&dry), 1);
    assert_eq!(atom_types(&dry).unwrap(), vec!["Ar"]);
    assert_eq!(n_bonds(&dry), 0);
}

#[test]
fn selecting_atoms_of_a_bondless_molecule() {
    let s = solvated();
    let sub = s.sub_dimension(vec![3], ATOM, true).unwrap();
    assert_eq!(n_molecules(&sub), 1);
    assert_eq!(n_atoms(&sub), 1);
    assert_eq!(n_bonds(&sub), 0);
}

#[test]
fn hydrogens_lose_their_bonds() {
    let s = solvated();
    let h = s.select(&Query::new().equals("type_array", "H")).unwrap();
    assert_eq!(n_atoms(&h), 4);
    assert_eq!(n_bonds(&h), 0);
    assert_eq!(n_molecules(&h), 2);
}

#[test]
fn reversing_molecules_keeps_bonds_inside_them() {
    let mut s = solvated();
    s.reorder_dimension(&[2, 1, 0], MOLECULE).unwrap();
    assert_eq!(atom_types(&s).unwrap(), vec!["O", "H", "H", "Ar", "O", "H", "H"]);
    assert_eq!(s.relation("bonds").unwrap().values(), &[0, 1, 0, 2, 4, 5, 4, 6]);
    assert_eq!(s.map(BOND, MOLECULE).unwrap().values(), &[0, 0, 2, 2]);
    s.check_integrity().unwrap();
}

#[test]
fn extracting_a_molecule() {
    let s = solvated();
    let m = s.subentity(schema::molecule().unwrap(), 2).unwrap();
    assert_eq!(m, water());
    assert_eq!(
        m.field("molecule_name").unwrap().scalar(),
        Some(Value::from("water"))
    );
}

#[test]
fn box_survives_serialization() {
    let mut s = solvated();
    set_box_vectors(&mut s, [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]).unwrap();
    let bytes = to_bytes(&s).unwrap();
    let restored = from_bytes(schema::system().unwrap(), &bytes).unwrap();
    assert_eq!(restored, s);
}

#[test]
fn box_set_before_the_first_molecule_is_kept() {
    let mut s = system(&[]).unwrap();
    set_box_vectors(&mut s, [[2.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 2.0]]).unwrap();
    s.add_entity(water()).unwrap();
    s.add_entity(argon()).unwrap();

    assert_eq!(n_molecules(&s), 2);
    let value = s.field("box_vectors").unwrap().value().clone();
    assert_eq!(
        value.as_floats().unwrap(),
        &[2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0]
    );
}

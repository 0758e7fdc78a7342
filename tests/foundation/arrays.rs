//! Integration tests for typed arrays
//!
//! Tests construction, row access, slicing and extension.

use dimtable_foundation::{Array, ArrayData, ElementType, ErrorKind, Shape, Value};

// =============================================================================
// Construction
// =============================================================================

#[test]
fn scalars_have_one_element_per_row() {
    let a = Array::scalars(vec![1.0, 2.0, 3.0]);
    assert_eq!(a.rows(), 3);
    assert_eq!(a.width(), 1);
    assert_eq!(a.element_type(), ElementType::Float);
    assert!(a.row_shape().is_scalar());
}

#[test]
fn shaped_rows() {
    let a = Array::new(vec![0_i64, 1, 2, 3, 4, 5], [2]).unwrap();
    assert_eq!(a.rows(), 3);
    assert_eq!(a.row_shape(), &Shape::new([2]));
    assert_eq!(a.get(3), Some(Value::Int(3)));
    assert_eq!(a.into_data(), ArrayData::Int(vec![0, 1, 2, 3, 4, 5]));
}

#[test]
fn ragged_data_is_rejected() {
    let err = Array::new(vec![0.0; 5], [3]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::SizeMismatch { .. }));
}

#[test]
fn defaults_follow_element_type() {
    let a = Array::defaults(ElementType::Str, Shape::scalar(), 2);
    assert_eq!(a.as_strs().unwrap(), &[String::new(), String::new()]);
    let b = Array::defaults(ElementType::Bool, Shape::new([3]), 1);
    assert_eq!(b.as_bools().unwrap(), &[false, false, false]);
}

// =============================================================================
// Row Operations
// =============================================================================

#[test]
fn take_copies_rows_in_order() {
    let a = Array::float_rows(&[[0.0, 0.5], [1.0, 1.5], [2.0, 2.5]]);
    let b = a.take(&[2, 0]);
    assert_eq!(b.as_floats().unwrap(), &[2.0, 2.5, 0.0, 0.5]);
}

#[test]
fn extend_requires_matching_rows() {
    let mut a = Array::scalars(vec!["C", "O"]);
    a.extend(&Array::scalars(vec!["N"])).unwrap();
    assert_eq!(a.rows(), 3);

    let err = a.extend(&Array::scalars(vec![1_i64])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));

    let err = a.extend(&Array::float_rows(&[[1.0, 2.0]])).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ShapeMismatch { .. }));
}

#[test]
fn row_equals_only_matches_scalars() {
    let names = Array::scalars(vec!["CA", "CB"]);
    assert!(names.row_equals(1, &Value::from("CB")));
    assert!(!names.row_equals(1, &Value::from(1.0)));

    let coords = Array::float_rows(&[[1.0, 1.0]]);
    assert!(!coords.row_equals(0, &Value::Float(1.0)));
}

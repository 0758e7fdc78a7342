//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use dimtable_foundation::{ElementType, Error, ErrorContext, ErrorKind, Shape};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_type_mismatch() {
    let err = Error::type_mismatch("charge", ElementType::Float, ElementType::Str);
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("charge"));
}

#[test]
fn error_shape_mismatch() {
    let err = Error::shape_mismatch("r_array", Shape::new([3]), Shape::scalar());
    assert!(matches!(err.kind, ErrorKind::ShapeMismatch { .. }));
    assert!(format!("{err}").contains("r_array"));
}

#[test]
fn error_dangling() {
    let err = Error::dangling("bonds", 12);
    assert!(matches!(
        err.kind,
        ErrorKind::DanglingReference { value: 12, .. }
    ));
    assert!(format!("{err}").contains("12"));
}

#[test]
fn error_size_mismatch() {
    let err = Error::size_mismatch("type_array", 4, 3);
    let ErrorKind::SizeMismatch {
        expected, actual, ..
    } = err.kind
    else {
        panic!("expected SizeMismatch");
    };
    assert_eq!((expected, actual), (4, 3));
}

#[test]
fn error_unknown_names() {
    assert!(matches!(
        Error::unknown_column("mass").kind,
        ErrorKind::UnknownColumn(_)
    ));
    assert!(matches!(
        Error::unknown_dimension("residue").kind,
        ErrorKind::UnknownDimension(_)
    ));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_attached_once() {
    let err = Error::invalid_permutation("repeated row 2")
        .with_context(ErrorContext::new("reorder_dimension").with_dimension("atom"))
        .with_context(ErrorContext::new("outer"));
    let ctx = err.context.unwrap();
    assert_eq!(ctx.operation.as_deref(), Some("reorder_dimension"));
    assert_eq!(ctx.dimension.as_deref(), Some("atom"));
}

#[test]
fn context_display() {
    let ctx = ErrorContext::new("set_relation")
        .with_dimension("bond")
        .with_column("bonds");
    let msg = format!("{ctx}");
    assert!(msg.contains("set_relation"));
    assert!(msg.contains("bond"));
    assert!(msg.contains("bonds"));
}

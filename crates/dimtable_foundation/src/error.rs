//! Error types for the Dimtable system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//! Every failure is local and synchronous; nothing is retried.

use std::fmt;

use thiserror::Error;

use crate::types::{ElementType, Shape};

/// Convenience result alias used across all Dimtable crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Dimtable operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    ///
    /// Context already attached by an inner operation is kept.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        if self.context.is_none() {
            self.context = Some(context);
        }
        self
    }

    /// Creates a schema declaration error.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Schema(message.into()))
    }

    /// Creates an element type mismatch error.
    #[must_use]
    pub fn type_mismatch(column: impl Into<String>, expected: ElementType, actual: ElementType) -> Self {
        Self::new(ErrorKind::TypeMismatch {
            column: column.into(),
            expected,
            actual,
        })
    }

    /// Creates a per-row shape mismatch error.
    #[must_use]
    pub fn shape_mismatch(column: impl Into<String>, expected: Shape, actual: Shape) -> Self {
        Self::new(ErrorKind::ShapeMismatch {
            column: column.into(),
            expected,
            actual,
        })
    }

    /// Creates a size mismatch error.
    #[must_use]
    pub fn size_mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::SizeMismatch {
            what: what.into(),
            expected,
            actual,
        })
    }

    /// Creates a dangling reference error for a value outside an index domain.
    #[must_use]
    pub fn dangling(column: impl Into<String>, value: usize) -> Self {
        Self::new(ErrorKind::DanglingReference {
            column: column.into(),
            value,
        })
    }

    /// Creates an invalid permutation error.
    #[must_use]
    pub fn invalid_permutation(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidPermutation(reason.into()))
    }

    /// Creates an unknown column error.
    #[must_use]
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownColumn(name.into()))
    }

    /// Creates an unknown dimension error.
    #[must_use]
    pub fn unknown_dimension(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownDimension(name.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A descriptor or schema was declared inconsistently.
    #[error("schema error: {0}")]
    Schema(String),

    /// A value array has the wrong element type for its column.
    #[error("type mismatch on {column}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The column being assigned.
        column: String,
        /// The declared element type.
        expected: ElementType,
        /// The element type supplied.
        actual: ElementType,
    },

    /// A value array has the wrong per-row shape for its column.
    #[error("shape mismatch on {column}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// The column being assigned.
        column: String,
        /// The declared per-row shape.
        expected: Shape,
        /// The per-row shape supplied.
        actual: Shape,
    },

    /// A relation or map value lies outside its index domain.
    #[error("dangling reference in {column}: {value} is outside the index domain")]
    DanglingReference {
        /// The relation or map holding the value.
        column: String,
        /// The offending value.
        value: usize,
    },

    /// A relation owns rows while the dimension it indexes into is empty.
    #[error("relation {relation} has rows but target dimension {target} is empty")]
    EmptyTarget {
        /// The relation name.
        relation: String,
        /// The empty target dimension.
        target: String,
    },

    /// A reorder was requested with a non-bijective order.
    #[error("invalid permutation: {0}")]
    InvalidPermutation(String),

    /// An array or requested size does not match what the operation expects.
    #[error("size mismatch for {what}: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Description of what was being sized.
        what: String,
        /// The expected size.
        expected: usize,
        /// The size supplied.
        actual: usize,
    },

    /// A selection is malformed for the dimension it targets.
    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    /// Row index past the end of a dimension.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The size of the dimension.
        length: usize,
    },

    /// No column with this name exists (or it has a different kind).
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// No dimension with this name exists.
    #[error("unknown dimension: {0}")]
    UnknownDimension(String),

    /// No map between these two dimensions exists.
    #[error("unknown map: {child} -> {group}")]
    UnknownMap {
        /// The child dimension.
        child: String,
        /// The group dimension.
        group: String,
    },

    /// An operation needs an input array the caller did not supply.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// Encoding or decoding a store snapshot failed.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// The public operation that failed (e.g. `reorder_dimension`).
    pub operation: Option<String>,
    /// The dimension the operation was applied to.
    pub dimension: Option<String>,
    /// The column involved, if any.
    pub column: Option<String>,
}

impl ErrorContext {
    /// Creates a context naming the failing operation.
    #[must_use]
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            dimension: None,
            column: None,
        }
    }

    /// Sets the dimension.
    #[must_use]
    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = Some(dimension.into());
        self
    }

    /// Sets the column.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = &self.operation {
            write!(f, "in {op}")?;
        }
        if let Some(dim) = &self.dimension {
            write!(f, " on dimension {dim}")?;
        }
        if let Some(col) = &self.column {
            write!(f, " for column {col}")?;
        }
        Ok(())
    }
}

//! Row-major typed arrays backing every column.
//!
//! An [`Array`] is a flat element buffer plus a fixed per-row [`Shape`].
//! Row `i` occupies elements `i * width .. (i + 1) * width`.

use crate::error::{Error, ErrorKind, Result};
use crate::types::{ElementType, Shape, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Flat element storage, one variant per [`ElementType`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArrayData {
    /// Float elements.
    Float(Vec<f64>),
    /// Integer elements.
    Int(Vec<i64>),
    /// Boolean elements.
    Bool(Vec<bool>),
    /// String elements.
    Str(Vec<String>),
}

impl ArrayData {
    /// Creates an empty buffer of the given type.
    #[must_use]
    pub fn empty(ty: ElementType) -> Self {
        match ty {
            ElementType::Float => Self::Float(Vec::new()),
            ElementType::Int => Self::Int(Vec::new()),
            ElementType::Bool => Self::Bool(Vec::new()),
            ElementType::Str => Self::Str(Vec::new()),
        }
    }

    /// Creates a buffer of `len` copies of `value`.
    #[must_use]
    pub fn filled(value: &Value, len: usize) -> Self {
        match value {
            Value::Float(v) => Self::Float(vec![*v; len]),
            Value::Int(v) => Self::Int(vec![*v; len]),
            Value::Bool(v) => Self::Bool(vec![*v; len]),
            Value::Str(v) => Self::Str(vec![v.clone(); len]),
        }
    }

    /// Returns the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Float(_) => ElementType::Float,
            Self::Int(_) => ElementType::Int,
            Self::Bool(_) => ElementType::Bool,
            Self::Str(_) => ElementType::Str,
        }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Str(v) => v.len(),
        }
    }

    /// Returns true if there are no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns element `i` as a [`Value`].
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Value> {
        match self {
            Self::Float(v) => v.get(i).map(|x| Value::Float(*x)),
            Self::Int(v) => v.get(i).map(|x| Value::Int(*x)),
            Self::Bool(v) => v.get(i).map(|x| Value::Bool(*x)),
            Self::Str(v) => v.get(i).map(|x| Value::Str(x.clone())),
        }
    }

    fn gather(&self, rows: &[usize], width: usize) -> Self {
        fn pick<T: Clone>(src: &[T], rows: &[usize], width: usize) -> Vec<T> {
            let mut out = Vec::with_capacity(rows.len() * width);
            for &r in rows {
                out.extend_from_slice(&src[r * width..(r + 1) * width]);
            }
            out
        }
        match self {
            Self::Float(v) => Self::Float(pick(v, rows, width)),
            Self::Int(v) => Self::Int(pick(v, rows, width)),
            Self::Bool(v) => Self::Bool(pick(v, rows, width)),
            Self::Str(v) => Self::Str(pick(v, rows, width)),
        }
    }

    fn append(&mut self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a.extend_from_slice(b),
            (Self::Int(a), Self::Int(b)) => a.extend_from_slice(b),
            (Self::Bool(a), Self::Bool(b)) => a.extend_from_slice(b),
            (Self::Str(a), Self::Str(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}

impl From<Vec<f64>> for ArrayData {
    fn from(v: Vec<f64>) -> Self {
        Self::Float(v)
    }
}

impl From<Vec<i64>> for ArrayData {
    fn from(v: Vec<i64>) -> Self {
        Self::Int(v)
    }
}

impl From<Vec<bool>> for ArrayData {
    fn from(v: Vec<bool>) -> Self {
        Self::Bool(v)
    }
}

impl From<Vec<String>> for ArrayData {
    fn from(v: Vec<String>) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<&str>> for ArrayData {
    fn from(v: Vec<&str>) -> Self {
        Self::Str(v.into_iter().map(str::to_string).collect())
    }
}

/// A typed array of rows with a fixed per-row shape.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Array {
    data: ArrayData,
    row_shape: Shape,
}

impl Array {
    /// Creates an array from flat data and a per-row shape.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape has zero width or the element count is
    /// not a multiple of the row width.
    pub fn new(data: impl Into<ArrayData>, row_shape: impl Into<Shape>) -> Result<Self> {
        let data = data.into();
        let row_shape = row_shape.into();
        let width = row_shape.width();
        if width == 0 {
            return Err(Error::new(ErrorKind::Schema(format!(
                "row shape {row_shape} has no elements"
            ))));
        }
        if data.len() % width != 0 {
            return Err(Error::size_mismatch(
                format!("elements for row shape {row_shape}"),
                data.len().div_ceil(width) * width,
                data.len(),
            ));
        }
        Ok(Self { data, row_shape })
    }

    /// Creates an array with one scalar per row.
    #[must_use]
    pub fn scalars(data: impl Into<ArrayData>) -> Self {
        Self {
            data: data.into(),
            row_shape: Shape::scalar(),
        }
    }

    /// Creates an array of fixed-width float rows, e.g. coordinates.
    #[must_use]
    pub fn float_rows<const N: usize>(rows: &[[f64; N]]) -> Self {
        Self {
            data: ArrayData::Float(rows.iter().flatten().copied().collect()),
            row_shape: Shape::from([N]),
        }
    }

    /// Creates `rows` rows filled with the type-appropriate default.
    #[must_use]
    pub fn defaults(ty: ElementType, row_shape: Shape, rows: usize) -> Self {
        Self::filled(&ty.default_value(), row_shape, rows)
    }

    /// Creates `rows` rows with every element set to `value`.
    #[must_use]
    pub fn filled(value: &Value, row_shape: Shape, rows: usize) -> Self {
        let len = rows * row_shape.width();
        Self {
            data: ArrayData::filled(value, len),
            row_shape,
        }
    }

    /// Creates an array with zero rows.
    #[must_use]
    pub fn empty(ty: ElementType, row_shape: Shape) -> Self {
        Self {
            data: ArrayData::empty(ty),
            row_shape,
        }
    }

    /// Returns the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Returns the per-row shape.
    #[must_use]
    pub fn row_shape(&self) -> &Shape {
        &self.row_shape
    }

    /// Returns the number of elements per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.row_shape.width()
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.data.len() / self.width()
    }

    /// Returns the flat element buffer.
    #[must_use]
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Consumes the array, returning its flat element buffer.
    #[must_use]
    pub fn into_data(self) -> ArrayData {
        self.data
    }

    /// Returns the float elements, if this is a float array.
    #[must_use]
    pub fn as_floats(&self) -> Option<&[f64]> {
        match &self.data {
            ArrayData::Float(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the integer elements, if this is an integer array.
    #[must_use]
    pub fn as_ints(&self) -> Option<&[i64]> {
        match &self.data {
            ArrayData::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the boolean elements, if this is a boolean array.
    #[must_use]
    pub fn as_bools(&self) -> Option<&[bool]> {
        match &self.data {
            ArrayData::Bool(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the string elements, if this is a string array.
    #[must_use]
    pub fn as_strs(&self) -> Option<&[String]> {
        match &self.data {
            ArrayData::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the element at flat position `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Value> {
        self.data.get(i)
    }

    /// Returns a new array holding `rows`, in the given order.
    ///
    /// Every entry of `rows` must be below [`Array::rows`].
    #[must_use]
    pub fn take(&self, rows: &[usize]) -> Self {
        Self {
            data: self.data.gather(rows, self.width()),
            row_shape: self.row_shape.clone(),
        }
    }

    /// Appends the rows of `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if element types or row shapes differ.
    pub fn extend(&mut self, other: &Array) -> Result<()> {
        if self.row_shape != other.row_shape {
            return Err(Error::shape_mismatch(
                "array",
                self.row_shape.clone(),
                other.row_shape.clone(),
            ));
        }
        let (expected, actual) = (self.element_type(), other.element_type());
        if !self.data.append(&other.data) {
            return Err(Error::type_mismatch("array", expected, actual));
        }
        Ok(())
    }

    /// Checks whether a scalar row equals `value`.
    ///
    /// Rows wider than one element never match.
    #[must_use]
    pub fn row_equals(&self, row: usize, value: &Value) -> bool {
        if self.width() != 1 {
            return false;
        }
        match (&self.data, value) {
            (ArrayData::Float(v), Value::Float(x)) => v.get(row) == Some(x),
            (ArrayData::Int(v), Value::Int(x)) => v.get(row) == Some(x),
            (ArrayData::Bool(v), Value::Bool(x)) => v.get(row) == Some(x),
            (ArrayData::Str(v), Value::Str(x)) => v.get(row) == Some(x),
            _ => false,
        }
    }
}

//! Dimensionless field columns.

use dimtable_foundation::{Array, ElementType, Error, Result, Shape, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single value (or fixed-shape value) shared by the whole store.
///
/// Stored as a one-row [`Array`] so fields and attribute rows convert
/// into each other without reshaping.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldColumn {
    name: String,
    element_type: ElementType,
    shape: Shape,
    default: Value,
    value: Array,
}

impl FieldColumn {
    /// Creates a field holding its default.
    #[must_use]
    pub fn new(name: impl Into<String>, element_type: ElementType, shape: Shape, default: Value) -> Self {
        let value = Array::filled(&default, shape.clone(), 1);
        Self {
            name: name.into(),
            element_type,
            shape,
            default,
            value,
        }
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Returns the shape of the value.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the value as a one-row array.
    #[must_use]
    pub fn value(&self) -> &Array {
        &self.value
    }

    /// Returns the first element; the whole value for scalar fields.
    #[must_use]
    pub fn scalar(&self) -> Option<Value> {
        self.value.get(0)
    }

    /// Resets the field to its default.
    pub fn empty(&mut self) {
        self.value = Array::filled(&self.default, self.shape.clone(), 1);
    }

    /// Overwrites the value.
    ///
    /// # Errors
    ///
    /// Returns an error if the array is not exactly one row of the declared
    /// type and shape.
    pub fn set(&mut self, value: Array) -> Result<()> {
        if value.element_type() != self.element_type {
            return Err(Error::type_mismatch(
                &self.name,
                self.element_type,
                value.element_type(),
            ));
        }
        if value.row_shape() != &self.shape {
            return Err(Error::shape_mismatch(
                &self.name,
                self.shape.clone(),
                value.row_shape().clone(),
            ));
        }
        if value.rows() != 1 {
            return Err(Error::size_mismatch(
                format!("field {}", self.name),
                1,
                value.rows(),
            ));
        }
        self.value = value;
        Ok(())
    }

    /// Overwrites a scalar field from a single value.
    ///
    /// # Errors
    ///
    /// Same as [`FieldColumn::set`].
    pub fn set_scalar(&mut self, value: &Value) -> Result<()> {
        self.set(Array::filled(value, Shape::scalar(), 1))
    }
}

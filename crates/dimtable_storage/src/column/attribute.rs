//! Per-row attribute columns.

use dimtable_foundation::{Array, ElementType, Error, ErrorKind, Result, Shape, Value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::check_permutation;
use super::field::FieldColumn;

/// A value array with one row per row of its owning dimension.
///
/// An unpopulated column holds no array at all, which is distinct from
/// an array with zero rows.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeColumn {
    name: String,
    dim: String,
    element_type: ElementType,
    shape: Shape,
    default: Value,
    value: Option<Array>,
}

impl AttributeColumn {
    /// Creates an unpopulated column.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dim: impl Into<String>,
        element_type: ElementType,
        shape: Shape,
        default: Value,
    ) -> Self {
        Self {
            name: name.into(),
            dim: dim.into(),
            element_type,
            shape,
            default,
            value: None,
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the owning dimension.
    #[must_use]
    pub fn dim(&self) -> &str {
        &self.dim
    }

    /// Returns the element type.
    #[must_use]
    pub const fn element_type(&self) -> ElementType {
        self.element_type
    }

    /// Returns the per-row shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the number of rows (zero when unpopulated).
    #[must_use]
    pub fn size(&self) -> usize {
        self.value.as_ref().map_or(0, Array::rows)
    }

    /// Returns the stored array, or `None` if the column was never populated.
    #[must_use]
    pub fn values(&self) -> Option<&Array> {
        self.value.as_ref()
    }

    /// Returns the element at flat position `i`.
    #[must_use]
    pub fn get(&self, i: usize) -> Option<Value> {
        self.value.as_ref().and_then(|a| a.get(i))
    }

    /// Allocates `size` default-valued rows.
    ///
    /// A size of zero leaves the column unpopulated.
    pub fn empty(&mut self, size: usize) {
        self.value = (size > 0).then(|| self.defaults(size));
    }

    /// Replaces the stored array.
    ///
    /// # Errors
    ///
    /// Returns an error if the element type or row shape does not match.
    pub fn set(&mut self, array: Array) -> Result<()> {
        self.check(&array)?;
        self.value = Some(array);
        Ok(())
    }

    /// Permutes rows so that new row `i` is old row `order[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is not a bijection on `0..size`.
    pub fn reorder(&mut self, order: &[usize]) -> Result<()> {
        check_permutation(order, self.size())?;
        if let Some(array) = &self.value {
            self.value = Some(array.take(order));
        }
        Ok(())
    }

    /// Returns a new column holding only `rows`, value for value.
    ///
    /// Every entry of `rows` must be below [`AttributeColumn::size`].
    #[must_use]
    pub fn sub(&self, rows: &[usize]) -> Self {
        Self {
            value: self.value.as_ref().map(|a| a.take(rows)),
            ..self.header()
        }
    }

    /// Appends the rows of another column of the same declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if the other column's array does not match.
    pub fn append(&mut self, other: &Self) -> Result<()> {
        let Some(theirs) = &other.value else {
            return Ok(());
        };
        self.check(theirs)?;
        match &mut self.value {
            Some(ours) => ours.extend(theirs)?,
            None => self.value = Some(theirs.clone()),
        }
        Ok(())
    }

    /// Appends `extra` default-valued rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored array no longer matches the declaration.
    pub fn grow(&mut self, extra: usize) -> Result<()> {
        if extra == 0 {
            return Ok(());
        }
        let defaults = self.defaults(extra);
        match &mut self.value {
            Some(ours) => ours.extend(&defaults)?,
            None => self.value = Some(defaults),
        }
        Ok(())
    }

    /// Turns row `row` into a field column of the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is out of bounds.
    pub fn field(&self, row: usize) -> Result<FieldColumn> {
        let size = self.size();
        let Some(array) = self.value.as_ref().filter(|_| row < size) else {
            return Err(Error::new(ErrorKind::IndexOutOfBounds {
                index: row,
                length: size,
            }));
        };
        let mut field = FieldColumn::new(
            self.name.clone(),
            self.element_type,
            self.shape.clone(),
            self.default.clone(),
        );
        field.set(array.take(&[row]))?;
        Ok(field)
    }

    fn defaults(&self, rows: usize) -> Array {
        Array::filled(&self.default, self.shape.clone(), rows)
    }

    fn header(&self) -> Self {
        Self {
            name: self.name.clone(),
            dim: self.dim.clone(),
            element_type: self.element_type,
            shape: self.shape.clone(),
            default: self.default.clone(),
            value: None,
        }
    }

    fn check(&self, array: &Array) -> Result<()> {
        if array.element_type() != self.element_type {
            return Err(Error::type_mismatch(
                &self.name,
                self.element_type,
                array.element_type(),
            ));
        }
        if array.row_shape() != &self.shape {
            return Err(Error::shape_mismatch(
                &self.name,
                self.shape.clone(),
                array.row_shape().clone(),
            ));
        }
        Ok(())
    }
}

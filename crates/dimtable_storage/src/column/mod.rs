//! Instance columns: the live arrays created from schema descriptors.
//!
//! Three kinds exist:
//! - [`AttributeColumn`] - one value row per row of its owning dimension
//! - [`RelationColumn`] - index rows referencing another dimension
//! - [`FieldColumn`] - a single value not tied to any dimension
//!
//! [`Column`] is the tagged union the store keeps in its name lookup table.

mod attribute;
mod field;
mod relation;

pub use attribute::AttributeColumn;
pub use field::FieldColumn;
pub use relation::RelationColumn;

use dimtable_foundation::{Error, Result};

use crate::schema::ColumnKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any instance column.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Column {
    /// Per-row values.
    Attribute(AttributeColumn),
    /// Per-row indices into a target dimension.
    Relation(RelationColumn),
    /// A dimensionless value.
    Field(FieldColumn),
}

impl Column {
    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Attribute(c) => c.name(),
            Self::Relation(c) => c.name(),
            Self::Field(c) => c.name(),
        }
    }

    /// Returns the column kind.
    #[must_use]
    pub const fn kind(&self) -> ColumnKind {
        match self {
            Self::Attribute(_) => ColumnKind::Attribute,
            Self::Relation(_) => ColumnKind::Relation,
            Self::Field(_) => ColumnKind::Field,
        }
    }

    /// Returns the owning dimension, if the column has one.
    #[must_use]
    pub fn dim(&self) -> Option<&str> {
        match self {
            Self::Attribute(c) => Some(c.dim()),
            Self::Relation(c) => Some(c.dim()),
            Self::Field(_) => None,
        }
    }

    /// Returns the attribute column, if this is one.
    #[must_use]
    pub fn as_attribute(&self) -> Option<&AttributeColumn> {
        match self {
            Self::Attribute(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the relation column, if this is one.
    #[must_use]
    pub fn as_relation(&self) -> Option<&RelationColumn> {
        match self {
            Self::Relation(c) => Some(c),
            _ => None,
        }
    }

    /// Returns the field column, if this is one.
    #[must_use]
    pub fn as_field(&self) -> Option<&FieldColumn> {
        match self {
            Self::Field(c) => Some(c),
            _ => None,
        }
    }
}

/// Checks that `order` is a bijection on `0..size`.
pub(crate) fn check_permutation(order: &[usize], size: usize) -> Result<()> {
    if order.len() != size {
        return Err(Error::invalid_permutation(format!(
            "order has {} entries for {size} rows",
            order.len()
        )));
    }
    let mut seen = vec![false; size];
    for &i in order {
        if i >= size {
            return Err(Error::invalid_permutation(format!(
                "{i} is out of range for {size} rows"
            )));
        }
        if seen[i] {
            return Err(Error::invalid_permutation(format!("{i} appears twice")));
        }
        seen[i] = true;
    }
    Ok(())
}

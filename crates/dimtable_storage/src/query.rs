//! Row predicates evaluated into cascading selections.
//!
//! A [`Query`] collects predicates over dimensions and attributes. Each
//! predicate yields a boolean mask over one dimension; masks on the same
//! dimension are combined with AND, and the result is applied through the
//! usual propagation so related dimensions stay consistent.

use std::collections::BTreeMap;

use dimtable_foundation::{Error, ErrorContext, ErrorKind, Result, Selection, Value};
use log::debug;

use crate::store::EntityStore;

/// A single row predicate.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Keeps the selected rows of a dimension.
    Index {
        /// Dimension the selection applies to.
        dimension: String,
        /// Rows to keep.
        selection: Selection,
    },
    /// Keeps rows whose scalar attribute equals `value`.
    Equals {
        /// Attribute compared.
        attribute: String,
        /// Value to match.
        value: Value,
    },
    /// Keeps rows whose scalar attribute equals any of `values`.
    IsIn {
        /// Attribute compared.
        attribute: String,
        /// Accepted values.
        values: Vec<Value>,
    },
}

/// A conjunction of predicates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    predicates: Vec<Predicate>,
}

impl Query {
    /// Creates a query that keeps everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only `selection` of `dimension`.
    #[must_use]
    pub fn index(mut self, dimension: impl Into<String>, selection: impl Into<Selection>) -> Self {
        self.predicates.push(Predicate::Index {
            dimension: dimension.into(),
            selection: selection.into(),
        });
        self
    }

    /// Keeps rows of `dimension` flagged in `mask`.
    ///
    /// This is the entry point for predicates computed outside the store,
    /// such as distance cut-offs.
    #[must_use]
    pub fn mask(self, dimension: impl Into<String>, mask: Vec<bool>) -> Self {
        self.index(dimension, Selection::Mask(mask))
    }

    /// Keeps rows whose `attribute` equals `value`.
    #[must_use]
    pub fn equals(mut self, attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::Equals {
            attribute: attribute.into(),
            value: value.into(),
        });
        self
    }

    /// Keeps rows whose `attribute` equals one of `values`.
    #[must_use]
    pub fn is_in<V: Into<Value>>(
        mut self,
        attribute: impl Into<String>,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.predicates.push(Predicate::IsIn {
            attribute: attribute.into(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Returns the predicates in insertion order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Computes one combined mask per constrained dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if a predicate names an unknown dimension or
    /// attribute, compares a non-scalar attribute, or compares values of
    /// the wrong type.
    pub fn evaluate(&self, store: &EntityStore) -> Result<BTreeMap<String, Vec<bool>>> {
        let mut masks: BTreeMap<String, Vec<bool>> = BTreeMap::new();
        for predicate in &self.predicates {
            let (dimension, mask) = match predicate {
                Predicate::Index {
                    dimension,
                    selection,
                } => {
                    let size = store.dimension(dimension)?;
                    (dimension.clone(), selection.to_mask(size)?)
                }
                Predicate::Equals { attribute, value } => {
                    matching_rows(store, attribute, std::slice::from_ref(value))?
                }
                Predicate::IsIn { attribute, values } => matching_rows(store, attribute, values)?,
            };
            match masks.get_mut(&dimension) {
                Some(combined) => {
                    for (slot, keep) in combined.iter_mut().zip(mask) {
                        *slot &= keep;
                    }
                }
                None => {
                    masks.insert(dimension, mask);
                }
            }
        }
        Ok(masks)
    }
}

/// Mask over the owning dimension of rows equal to any of `values`.
fn matching_rows(
    store: &EntityStore,
    attribute: &str,
    values: &[Value],
) -> Result<(String, Vec<bool>)> {
    let ctx = || ErrorContext::new("query").with_column(attribute);
    let column = store.attribute(attribute).map_err(|e| e.with_context(ctx()))?;
    if !column.shape().is_scalar() {
        return Err(Error::new(ErrorKind::InvalidSelection(format!(
            "attribute {attribute} has shape {} and cannot be compared to a value",
            column.shape()
        )))
        .with_context(ctx()));
    }
    if let Some(bad) = values.iter().find(|v| v.element_type() != column.element_type()) {
        return Err(
            Error::type_mismatch(attribute, column.element_type(), bad.element_type())
                .with_context(ctx()),
        );
    }

    let size = store.size_of(column.dim());
    let mask = match column.values() {
        Some(array) => (0..size)
            .map(|row| values.iter().any(|v| array.row_equals(row, v)))
            .collect(),
        None => vec![false; size],
    };
    Ok((column.dim().to_string(), mask))
}

impl EntityStore {
    /// Returns a new store holding only the rows `query` keeps.
    ///
    /// # Errors
    ///
    /// Returns an error if the query cannot be evaluated against this store.
    pub fn select(&self, query: &Query) -> Result<Self> {
        let masks = query.evaluate(self)?;
        if masks.is_empty() {
            return Ok(self.clone());
        }
        let result = self.sub_dimensions(masks)?;
        debug!(
            "select: {} predicate(s) applied to {} store",
            query.predicates().len(),
            self.schema.name()
        );
        Ok(result)
    }
}

//! Relation columns: per-row indices into a target dimension.
//!
//! Besides its values, a relation carries an index domain: the target rows
//! it may currently reference. Whenever the target dimension is reordered,
//! subset or concatenated, the values are translated from the old domain
//! to the new one.

use dimtable_foundation::{Error, RemapStrategy, Remapper, Result, Shape};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::check_permutation;

/// Index rows referencing another dimension.
///
/// Maps between a child and a group dimension are relation columns with a
/// scalar row shape.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RelationColumn {
    name: String,
    dim: String,
    target: String,
    shape: Shape,
    values: Option<Vec<usize>>,
    index: Vec<usize>,
}

impl RelationColumn {
    /// Creates an unpopulated relation with the given index domain.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        dim: impl Into<String>,
        target: impl Into<String>,
        shape: Shape,
        index: Vec<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            dim: dim.into(),
            target: target.into(),
            shape,
            values: None,
            index,
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

    /// Returns the dimension the values index into.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the per-row shape.
    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Number of indices per row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.shape.width()
    }

    /// Returns the number of rows (zero when unpopulated).
    #[must_use]
    pub fn size(&self) -> usize {
        self.values.as_ref().map_or(0, |v| v.len() / self.width())
    }

    /// Returns true if values were ever allocated or assigned.
    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.values.is_some()
    }

    /// Returns the flat values, row-major.
    #[must_use]
    pub fn values(&self) -> &[usize] {
        self.values.as_deref().unwrap_or(&[])
    }

    /// Returns the indices of row `row`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[usize] {
        let w = self.width();
        &self.values()[row * w..(row + 1) * w]
    }

    /// Returns the index domain.
    #[must_use]
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Replaces the index domain without touching values.
    pub fn set_index(&mut self, index: Vec<usize>) {
        self.index = index;
    }

    /// Allocates `size` zero-valued rows.
    ///
    /// A size of zero leaves the relation unpopulated.
    pub fn empty(&mut self, size: usize) {
        self.values = (size > 0).then(|| vec![0; size * self.width()]);
    }

    /// Replaces the values, flat and row-major.
    ///
    /// # Errors
    ///
    /// Returns an error if the length is not a whole number of rows, or if
    /// any value lies outside the current index domain.
    pub fn set(&mut self, values: Vec<usize>) -> Result<()> {
        let w = self.width();
        if values.len() % w != 0 {
            return Err(Error::size_mismatch(
                format!("relation {} values", self.name),
                values.len().div_ceil(w) * w,
                values.len(),
            ));
        }
        let domain = self.domain_mask();
        if let Some(&bad) = values
            .iter()
            .find(|&&v| !domain.get(v).copied().unwrap_or(false))
        {
            return Err(Error::dangling(&self.name, bad));
        }
        self.values = Some(values);
        Ok(())
    }

    /// Returns the first stored value outside the index domain, if any.
    #[must_use]
    pub fn first_outside_domain(&self) -> Option<usize> {
        let domain = self.domain_mask();
        self.values()
            .iter()
            .copied()
            .find(|&v| !domain.get(v).copied().unwrap_or(false))
    }

    /// Permutes rows so that new row `i` is old row `order[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` is not a bijection on `0..size`.
    pub fn reorder(&mut self, order: &[usize]) -> Result<()> {
        check_permutation(order, self.size())?;
        if self.values.is_some() {
            self.values = Some(self.gather(order));
        }
        Ok(())
    }

    /// Returns a new relation holding only `rows`, without remapping.
    ///
    /// Every entry of `rows` must be below [`RelationColumn::size`].
    #[must_use]
    pub fn sub(&self, rows: &[usize]) -> Self {
        Self {
            values: self.values.as_ref().map(|_| self.gather(rows)),
            ..self.header()
        }
    }

    /// Rewrites every value from `old_domain[i]` to `new_domain[i]`.
    ///
    /// Values with no counterpart in `old_domain` become
    /// [`dimtable_foundation::NOT_FOUND`].
    ///
    /// # Errors
    ///
    /// Returns an error if the two domains differ in length.
    pub fn remap(
        &mut self,
        old_domain: &[usize],
        new_domain: &[usize],
        strategy: RemapStrategy,
    ) -> Result<()> {
        let remapper = Remapper::new(old_domain, new_domain, strategy)?;
        if let Some(values) = &mut self.values {
            remapper.apply(values);
        }
        Ok(())
    }

    /// Renumbers the index domain to `0..k`, translating values with it.
    ///
    /// # Errors
    ///
    /// Propagates remap failures.
    pub fn reindex(&mut self, strategy: RemapStrategy) -> Result<()> {
        let fresh: Vec<usize> = (0..self.index.len()).collect();
        if fresh == self.index {
            return Ok(());
        }
        let old = std::mem::take(&mut self.index);
        self.remap(&old, &fresh, strategy)?;
        self.index = fresh;
        Ok(())
    }

    /// Marks the rows whose every referenced value is kept in `selected`.
    ///
    /// `selected` is a keep mask over target rows; a row referencing a
    /// value outside it (or past its end) is left out. The result has one
    /// entry per row of this relation.
    #[must_use]
    pub fn argument_filter(&self, selected: &[bool]) -> Vec<bool> {
        (0..self.size())
            .map(|r| {
                self.row(r)
                    .iter()
                    .all(|&v| selected.get(v).copied().unwrap_or(false))
            })
            .collect()
    }

    /// Appends another relation's rows end to end.
    ///
    /// Both domains are laid out consecutively: this relation's domain is
    /// renumbered to `0..n`, the other's to `n..n + m`, and the other's
    /// values are translated into that range before concatenating.
    ///
    /// # Errors
    ///
    /// Returns an error if row widths differ.
    pub fn append(&mut self, other: &Self, strategy: RemapStrategy) -> Result<()> {
        if other.shape != self.shape {
            return Err(Error::shape_mismatch(
                &self.name,
                self.shape.clone(),
                other.shape.clone(),
            ));
        }
        self.reindex(strategy)?;
        let offset = self.index.len();
        let shifted: Vec<usize> = (offset..offset + other.index.len()).collect();

        if let Some(theirs) = &other.values {
            let remapper = Remapper::new(&other.index, &shifted, strategy)?;
            let ours = self.values.get_or_insert_with(Vec::new);
            ours.extend(theirs.iter().map(|&v| remapper.translate(v)));
        }
        self.index.extend(shifted);
        Ok(())
    }

    fn gather(&self, rows: &[usize]) -> Vec<usize> {
        let mut out = Vec::with_capacity(rows.len() * self.width());
        for &r in rows {
            out.extend_from_slice(self.row(r));
        }
        out
    }

    fn domain_mask(&self) -> Vec<bool> {
        let len = self.index.iter().max().map_or(0, |m| m + 1);
        let mut mask = vec![false; len];
        for &i in &self.index {
            mask[i] = true;
        }
        mask
    }

    fn header(&self) -> Self {
        Self {
            name: self.name.clone(),
            dim: self.dim.clone(),
            target: self.target.clone(),
            shape: self.shape.clone(),
            values: None,
            index: self.index.clone(),
        }
    }
}

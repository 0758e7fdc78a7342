//! Row selections over a single dimension.

use std::ops::Range;

use crate::error::{Error, ErrorKind, Result};

/// A selection of rows: either explicit indices or a boolean mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selection {
    /// Explicit row indices, kept in the given order.
    Indices(Vec<usize>),
    /// One flag per row; must be exactly as long as the dimension.
    Mask(Vec<bool>),
}

impl Selection {
    /// Selects every row of a dimension of `size` rows.
    #[must_use]
    pub fn all(size: usize) -> Self {
        Self::Indices((0..size).collect())
    }

    /// Resolves the selection to row indices for a dimension of `size` rows.
    ///
    /// Index lists keep their order; masks yield ascending indices.
    ///
    /// # Errors
    ///
    /// Returns an error if an index is out of bounds or a mask has the
    /// wrong length.
    pub fn resolve(&self, size: usize) -> Result<Vec<usize>> {
        match self {
            Self::Indices(indices) => {
                if let Some(&bad) = indices.iter().find(|&&i| i >= size) {
                    return Err(Error::new(ErrorKind::IndexOutOfBounds {
                        index: bad,
                        length: size,
                    }));
                }
                Ok(indices.clone())
            }
            Self::Mask(mask) => {
                if mask.len() != size {
                    return Err(Error::new(ErrorKind::InvalidSelection(format!(
                        "mask has {} entries for a dimension of {size} rows",
                        mask.len()
                    ))));
                }
                Ok(mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &keep)| keep.then_some(i))
                    .collect())
            }
        }
    }

    /// Resolves to ascending, de-duplicated row indices.
    ///
    /// # Errors
    ///
    /// Same as [`Selection::resolve`].
    pub fn resolve_sorted(&self, size: usize) -> Result<Vec<usize>> {
        let mut rows = self.resolve(size)?;
        rows.sort_unstable();
        rows.dedup();
        Ok(rows)
    }

    /// Resolves to a boolean mask for a dimension of `size` rows.
    ///
    /// # Errors
    ///
    /// Same as [`Selection::resolve`].
    pub fn to_mask(&self, size: usize) -> Result<Vec<bool>> {
        let mut mask = vec![false; size];
        for i in self.resolve(size)? {
            mask[i] = true;
        }
        Ok(mask)
    }
}

impl From<Vec<usize>> for Selection {
    fn from(indices: Vec<usize>) -> Self {
        Self::Indices(indices)
    }
}

impl From<&[usize]> for Selection {
    fn from(indices: &[usize]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl<const N: usize> From<[usize; N]> for Selection {
    fn from(indices: [usize; N]) -> Self {
        Self::Indices(indices.to_vec())
    }
}

impl From<Range<usize>> for Selection {
    fn from(range: Range<usize>) -> Self {
        Self::Indices(range.collect())
    }
}

impl From<Vec<bool>> for Selection {
    fn from(mask: Vec<bool>) -> Self {
        Self::Mask(mask)
    }
}

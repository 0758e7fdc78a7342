//! Index translation tables.
//!
//! A [`Remapper`] translates each value of an old index domain to the value
//! at the same position in a new domain. Relation values are small dense
//! non-negative integers, so the default table is a direct-addressed vector
//! sized `max(old) + 1`; a hash map is used when that would be too large.
//! Values without a mapping translate to [`NOT_FOUND`] instead of failing,
//! which lets callers filter on the result. A [`NOT_FOUND`] entry in the old
//! domain has nothing to translate and is skipped.

use std::collections::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sentinel produced for values that have no mapping.
pub const NOT_FOUND: usize = usize::MAX;

/// Default upper bound on the dense table length for [`RemapStrategy::Auto`].
pub const DEFAULT_DENSE_LIMIT: usize = 1 << 20;

/// Largest dense table any strategy builds, [`RemapStrategy::Dense`] included.
pub const DENSE_CEILING: usize = 1 << 26;

/// How a [`Remapper`] stores its translation table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RemapStrategy {
    /// Dense unless the table would exceed `dense_limit` entries.
    Auto {
        /// Largest dense table allowed.
        dense_limit: usize,
    },
    /// Use a direct-addressed vector up to [`DENSE_CEILING`] entries.
    Dense,
    /// Always use a hash map.
    Sparse,
}

impl Default for RemapStrategy {
    fn default() -> Self {
        Self::Auto {
            dense_limit: DEFAULT_DENSE_LIMIT,
        }
    }
}

/// Translation from an old index domain to a new one.
#[derive(Clone, Debug)]
pub enum Remapper {
    /// Direct-addressed table: `table[old] == new`.
    Dense(Vec<usize>),
    /// Hash table for domains with large maxima.
    Sparse(HashMap<usize, usize>),
}

impl Remapper {
    /// Builds a translation sending `old[i]` to `new[i]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two domains differ in length.
    pub fn new(old: &[usize], new: &[usize], strategy: RemapStrategy) -> Result<Self> {
        if old.len() != new.len() {
            return Err(Error::size_mismatch("remap domains", old.len(), new.len()));
        }
        let pairs = old
            .iter()
            .copied()
            .zip(new.iter().copied())
            .filter(|&(o, _)| o != NOT_FOUND);
        let table_len = old
            .iter()
            .copied()
            .filter(|&o| o != NOT_FOUND)
            .max()
            .map_or(0, |m| m + 1);
        let dense = match strategy {
            RemapStrategy::Dense => table_len <= DENSE_CEILING,
            RemapStrategy::Sparse => false,
            RemapStrategy::Auto { dense_limit } => table_len <= dense_limit.min(DENSE_CEILING),
        };

        if dense {
            let mut table = vec![NOT_FOUND; table_len];
            for (o, n) in pairs {
                table[o] = n;
            }
            Ok(Self::Dense(table))
        } else {
            Ok(Self::Sparse(pairs.collect()))
        }
    }

    /// Translates a single value.
    #[must_use]
    pub fn translate(&self, value: usize) -> usize {
        match self {
            Self::Dense(table) => table.get(value).copied().unwrap_or(NOT_FOUND),
            Self::Sparse(table) => table.get(&value).copied().unwrap_or(NOT_FOUND),
        }
    }

    /// Translates every value in place.
    pub fn apply(&self, values: &mut [usize]) {
        for v in values {
            *v = self.translate(*v);
        }
    }

    /// Returns true if this is the direct-addressed variant.
    #[must_use]
    pub const fn is_dense(&self) -> bool {
        matches!(self, Self::Dense(_))
    }
}

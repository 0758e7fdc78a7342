//! Growing and shrinking a single dimension.

use std::collections::BTreeMap;

use dimtable_foundation::{Error, ErrorContext, ErrorKind, Result};
use log::debug;

use crate::column::Column;
use crate::store::{EntityStore, MapKey};

/// Replacement arrays required to grow a dimension.
///
/// New rows of relations and maps cannot be inferred, so the caller hands
/// over the full new contents (old rows followed by new ones).
#[derive(Clone, Debug, Default)]
pub struct Expansion {
    maps: BTreeMap<String, Vec<usize>>,
    relations: BTreeMap<String, Vec<usize>>,
}

impl Expansion {
    /// Creates an expansion with no replacement arrays.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the full map from the grown dimension to `group`.
    #[must_use]
    pub fn with_map(mut self, group: impl Into<String>, values: Vec<usize>) -> Self {
        self.maps.insert(group.into(), values);
        self
    }

    /// Supplies the full values of a relation owned by the grown dimension.
    #[must_use]
    pub fn with_relation(mut self, name: impl Into<String>, values: Vec<usize>) -> Self {
        self.relations.insert(name.into(), values);
        self
    }
}

impl EntityStore {
    /// Grows `dimension` to `new_size` rows.
    ///
    /// New attribute rows take their defaults. Every relation owned by the
    /// dimension and every map from it must be supplied in full; relations
    /// and maps pointing into it see their index domain extended.
    ///
    /// # Errors
    ///
    /// Returns an error if the size would shrink, a required array is
    /// missing or has the wrong length, a supplied array names nothing the
    /// dimension owns, or a value falls outside its target dimension. The
    /// store is unchanged on error.
    pub fn expand_dimension(
        &mut self,
        new_size: usize,
        dimension: &str,
        mut expansion: Expansion,
    ) -> Result<()> {
        let ctx = || ErrorContext::new("expand_dimension").with_dimension(dimension);
        let old_size = self.dimension(dimension).map_err(|e| e.with_context(ctx()))?;
        if new_size < old_size {
            return Err(Error::size_mismatch(
                format!("expanded size of {dimension}"),
                old_size,
                new_size,
            )
            .with_context(ctx()));
        }

        let mut next = self.clone();
        next.dimensions.insert(dimension.to_string(), new_size);
        let target_size = |target: &str| {
            if target == dimension {
                new_size
            } else {
                self.size_of(target)
            }
        };

        next.update_columns(|column| {
            match column {
                Column::Attribute(a) if a.dim() == dimension => a.grow(new_size - old_size)?,
                Column::Relation(r) => {
                    if r.target() == dimension {
                        r.set_index((0..new_size).collect());
                    }
                    if r.dim() == dimension {
                        let values = expansion.relations.remove(r.name()).ok_or_else(|| {
                            Error::new(ErrorKind::MissingInput(format!(
                                "relation {} must be supplied to grow {dimension}",
                                r.name()
                            )))
                        })?;
                        let expected = new_size * r.width();
                        if values.len() != expected {
                            return Err(Error::size_mismatch(
                                format!("relation {}", r.name()),
                                expected,
                                values.len(),
                            ));
                        }
                        r.set_index((0..target_size(r.target())).collect());
                        r.set(values)?;
                    }
                }
                _ => {}
            }
            Ok(())
        })
        .map_err(|e| e.with_context(ctx()))?;

        let keys: Vec<MapKey> = next.maps.keys().cloned().collect();
        for key in keys {
            let Some(map) = next.maps.get_mut(&key) else {
                continue;
            };
            if key.group == dimension {
                map.set_index((0..new_size).collect());
            }
            if key.child == dimension {
                let values = expansion.maps.remove(&key.group).ok_or_else(|| {
                    Error::new(ErrorKind::MissingInput(format!(
                        "map {key} must be supplied to grow {dimension}"
                    )))
                    .with_context(ctx())
                })?;
                if values.len() != new_size {
                    return Err(
                        Error::size_mismatch(format!("map {key}"), new_size, values.len())
                            .with_context(ctx()),
                    );
                }
                map.set(values).map_err(|e| e.with_context(ctx()))?;
            }
        }

        if let Some(name) = expansion.relations.keys().next() {
            return Err(Error::unknown_column(name.clone()).with_context(ctx()));
        }
        if let Some(group) = expansion.maps.keys().next() {
            return Err(Error::new(ErrorKind::UnknownMap {
                child: dimension.to_string(),
                group: group.clone(),
            })
            .with_context(ctx()));
        }

        *self = next;
        debug!("expand_dimension: {dimension} grew from {old_size} to {new_size}");
        Ok(())
    }

    /// Keeps only the first `new_size` rows of `dimension`.
    ///
    /// Relation rows elsewhere that referenced a removed row are dropped.
    /// Groups of the removed rows stay in place.
    ///
    /// # Errors
    ///
    /// Returns an error if `new_size` exceeds the current size, or if a
    /// removed row is a group that still has children. The store is
    /// unchanged on error.
    pub fn shrink_dimension(&mut self, new_size: usize, dimension: &str) -> Result<()> {
        let ctx = || ErrorContext::new("shrink_dimension").with_dimension(dimension);
        let old_size = self.dimension(dimension).map_err(|e| e.with_context(ctx()))?;
        if new_size > old_size {
            return Err(Error::size_mismatch(
                format!("shrunk size of {dimension}"),
                old_size,
                new_size,
            )
            .with_context(ctx()));
        }
        *self = self
            .sub_dimension(0..new_size, dimension, false)
            .map_err(|e| e.with_context(ctx()))?;
        debug!("shrink_dimension: {dimension} shrank from {old_size} to {new_size}");
        Ok(())
    }
}

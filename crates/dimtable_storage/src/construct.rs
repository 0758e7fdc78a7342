//! Store construction: empty allocation and the bulk array path.

use std::collections::BTreeMap;
use std::sync::Arc;

use dimtable_foundation::{Array, Error, ErrorContext, ErrorKind, Result};
use log::debug;

use crate::column::Column;
use crate::schema::Schema;
use crate::store::{EntityStore, MapKey};

/// Column arrays for [`EntityStore::from_arrays`].
///
/// Dimension sizes are inferred from what is supplied; nothing needs to be
/// sized up front.
#[derive(Clone, Debug, Default)]
pub struct Arrays {
    pub(crate) attributes: Vec<(String, Array)>,
    pub(crate) relations: Vec<(String, Vec<usize>)>,
    pub(crate) fields: Vec<(String, Array)>,
    pub(crate) maps: Vec<(MapKey, Vec<usize>)>,
}

impl Arrays {
    /// Creates an empty set of inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies an attribute's rows.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, array: Array) -> Self {
        self.attributes.push((name.into(), array));
        self
    }

    /// Supplies a relation's values, flat and row-major.
    #[must_use]
    pub fn with_relation(mut self, name: impl Into<String>, values: Vec<usize>) -> Self {
        self.relations.push((name.into(), values));
        self
    }

    /// Supplies a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Array) -> Self {
        self.fields.push((name.into(), value));
        self
    }

    /// Supplies the map `child -> group`, one group row per child row.
    #[must_use]
    pub fn with_map(
        mut self,
        child: impl Into<String>,
        group: impl Into<String>,
        values: Vec<usize>,
    ) -> Self {
        self.maps.push((MapKey::new(child, group), values));
        self
    }
}

/// Records one inferred size, failing on a conflict.
fn settle(sizes: &mut BTreeMap<String, usize>, dim: &str, size: usize, what: &str) -> Result<()> {
    match sizes.get(dim) {
        Some(&known) if known != size => Err(Error::size_mismatch(what, known, size)
            .with_context(ErrorContext::new("from_arrays").with_dimension(dim))),
        Some(_) => Ok(()),
        None => {
            sizes.insert(dim.to_string(), size);
            Ok(())
        }
    }
}

impl EntityStore {
    /// Allocates a store with the requested dimension sizes.
    ///
    /// Dimensions not mentioned stay at size zero. Every attribute gets
    /// default rows, every relation zero-valued rows, and every relation's
    /// index domain is `0..size(target)`.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is not declared by the schema, or if
    /// a relation would own rows while its target dimension is empty.
    pub fn empty(schema: Arc<Schema>, sizes: &[(&str, usize)]) -> Result<Self> {
        let declared = schema.dimensions();
        let mut table = BTreeMap::new();
        for &(dim, size) in sizes {
            if !declared.contains(dim) {
                return Err(Error::unknown_dimension(dim)
                    .with_context(ErrorContext::new("empty").with_dimension(dim)));
            }
            table.insert(dim.to_string(), size);
        }
        Self::allocate(schema, &table)
    }

    /// Builds a store from column arrays and explicit maps.
    ///
    /// Owning dimensions are sized by the rows supplied for them; group and
    /// target dimensions that nothing sizes directly are inferred as
    /// `max(value) + 1`.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown columns, sizes that disagree, or values
    /// that do not resolve inside their target dimension.
    pub fn from_arrays(schema: Arc<Schema>, arrays: Arrays) -> Result<Self> {
        let mut sizes = BTreeMap::new();

        for (name, array) in &arrays.attributes {
            let attr = schema.attribute(name).ok_or_else(|| Error::unknown_column(name))?;
            settle(&mut sizes, &attr.dim, array.rows(), name)?;
        }
        for (name, values) in &arrays.relations {
            let rel = schema.relation(name).ok_or_else(|| Error::unknown_column(name))?;
            let width = rel.shape.width();
            if values.len() % width != 0 {
                return Err(Error::size_mismatch(
                    format!("relation {name} values"),
                    values.len().div_ceil(width) * width,
                    values.len(),
                ));
            }
            settle(&mut sizes, &rel.dim, values.len() / width, name)?;
        }
        for (key, values) in &arrays.maps {
            settle(&mut sizes, &key.child, values.len(), &key.to_string())?;
        }

        // Targets and groups nobody sized: smallest size that holds every value.
        let mut inferred: BTreeMap<String, usize> = BTreeMap::new();
        let referenced = arrays
            .relations
            .iter()
            .filter_map(|(name, values)| schema.relation(name).map(|r| (r.target.as_str(), values)))
            .chain(arrays.maps.iter().map(|(key, values)| (key.group.as_str(), values)));
        for (target, values) in referenced {
            if sizes.contains_key(target) {
                continue;
            }
            let needed = values.iter().max().map_or(0, |m| m + 1);
            let slot = inferred.entry(target.to_string()).or_insert(0);
            *slot = (*slot).max(needed);
        }
        sizes.extend(inferred);

        let mut store = Self::allocate(schema, &sizes)?;
        store.assign(arrays)?;

        debug!(
            "from_arrays: built {} store with dimensions {:?}",
            store.schema.name(),
            sizes
        );
        Ok(store)
    }

    /// Writes every supplied array into an allocated store.
    pub(crate) fn assign(&mut self, arrays: Arrays) -> Result<()> {
        for (name, array) in arrays.attributes {
            self.set_attribute(&name, array)?;
        }
        for (name, values) in arrays.relations {
            self.set_relation(&name, values)?;
        }
        for (name, value) in arrays.fields {
            self.set_field(&name, value)?;
        }
        for (key, values) in arrays.maps {
            self.set_map(&key.child, &key.group, values)?;
        }
        Ok(())
    }

    /// Allocates every column at the given sizes, accepting any dimension name.
    pub(crate) fn allocate(schema: Arc<Schema>, sizes: &BTreeMap<String, usize>) -> Result<Self> {
        let mut store = Self::new(schema);
        for (dim, &size) in sizes {
            store.dimensions.insert(dim.clone(), size);
        }

        for rel in store.schema.relations() {
            let owned = store.size_of(&rel.dim);
            if owned > 0 && store.size_of(&rel.target) == 0 {
                return Err(Error::new(ErrorKind::EmptyTarget {
                    relation: rel.name.clone(),
                    target: rel.target.clone(),
                })
                .with_context(ErrorContext::new("empty").with_column(&rel.name)));
            }
        }

        let dims = store.dimensions.clone();
        let size = |dim: &str| dims.get(dim).copied().unwrap_or(0);
        store.update_columns(|column| {
            match column {
                Column::Attribute(a) => a.empty(size(a.dim())),
                Column::Relation(r) => {
                    r.empty(size(r.dim()));
                    r.set_index((0..size(r.target())).collect());
                }
                Column::Field(f) => f.empty(),
            }
            Ok(())
        })?;
        Ok(store)
    }
}

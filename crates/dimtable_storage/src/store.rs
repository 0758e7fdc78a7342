//! The entity store: dimensions, columns and maps for one record instance.
//!
//! The store owns three tables:
//! - dimension name -> current size
//! - column name -> instance column (attribute, relation or field)
//! - (child, group) dimension pair -> map recording each child row's group
//!
//! Two invariants hold after every public operation: every relation value
//! lies in its index domain (which is always `0..size(target)`), and every
//! map row resolves to a valid row of its group dimension.

use std::fmt;
use std::sync::Arc;

use dimtable_foundation::{Array, Error, ErrorContext, ErrorKind, Result, Shape};
use im::OrdMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::column::{AttributeColumn, Column, FieldColumn, RelationColumn};
use crate::config::StoreConfig;
use crate::schema::Schema;

/// Identifies a map from a child dimension to a group dimension.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MapKey {
    /// Dimension whose rows are grouped.
    pub child: String,
    /// Dimension the map values index into.
    pub group: String,
}

impl MapKey {
    /// Creates a key for the map `child -> group`.
    #[must_use]
    pub fn new(child: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            group: group.into(),
        }
    }

    /// Creates an empty map column for this key.
    pub(crate) fn column(&self, group_size: usize) -> RelationColumn {
        RelationColumn::new(
            self.to_string(),
            self.child.clone(),
            self.group.clone(),
            Shape::scalar(),
            (0..group_size).collect(),
        )
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}->{}", self.child, self.group)
    }
}

/// A schema-declared, multi-dimensional columnar record instance.
///
/// `Clone` is a deep copy: mutating a clone never affects the original.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityStore {
    pub(crate) schema: Arc<Schema>,
    pub(crate) config: StoreConfig,
    pub(crate) dimensions: OrdMap<String, usize>,
    pub(crate) columns: OrdMap<String, Column>,
    pub(crate) maps: OrdMap<MapKey, RelationColumn>,
}

impl EntityStore {
    /// Creates a store with every dimension at size zero.
    #[must_use]
    pub fn new(schema: Arc<Schema>) -> Self {
        let dimensions = schema.dimensions().into_iter().map(|d| (d, 0usize)).collect();
        let columns = schema
            .attributes()
            .iter()
            .map(|a| (a.name.clone(), Column::Attribute(a.create())))
            .chain(
                schema
                    .relations()
                    .iter()
                    .map(|r| (r.name.clone(), Column::Relation(r.create(Vec::new())))),
            )
            .chain(
                schema
                    .fields()
                    .iter()
                    .map(|f| (f.name.clone(), Column::Field(f.create()))),
            )
            .collect();
        Self {
            schema,
            config: StoreConfig::default(),
            dimensions,
            columns,
            maps: OrdMap::new(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the size of a dimension.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension does not exist.
    pub fn dimension(&self, name: &str) -> Result<usize> {
        self.dimensions
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_dimension(name))
    }

    /// Iterates `(dimension, size)` pairs in name order.
    pub fn dimensions(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.dimensions.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Returns true when every dimension has size zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dimensions.values().all(|&n| n == 0)
    }

    /// Looks up a column of any kind.
    ///
    /// # Errors
    ///
    /// Returns an error if no column has this name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Iterates every column in name order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> + '_ {
        self.columns.values()
    }

    /// Looks up an attribute column.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no attribute with this name.
    pub fn attribute(&self, name: &str) -> Result<&AttributeColumn> {
        self.column(name)?
            .as_attribute()
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Looks up a relation column.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no relation with this name.
    pub fn relation(&self, name: &str) -> Result<&RelationColumn> {
        self.column(name)?
            .as_relation()
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Looks up a field column.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no field with this name.
    pub fn field(&self, name: &str) -> Result<&FieldColumn> {
        self.column(name)?
            .as_field()
            .ok_or_else(|| Error::unknown_column(name))
    }

    /// Looks up the map `child -> group`.
    ///
    /// # Errors
    ///
    /// Returns an error if no such map exists.
    pub fn map(&self, child: &str, group: &str) -> Result<&RelationColumn> {
        self.maps
            .get(&MapKey::new(child, group))
            .ok_or_else(|| {
                Error::new(ErrorKind::UnknownMap {
                    child: child.to_string(),
                    group: group.to_string(),
                })
            })
    }

    /// Iterates every map in key order.
    pub fn maps(&self) -> impl Iterator<Item = (&MapKey, &RelationColumn)> + '_ {
        self.maps.iter()
    }

    /// Overwrites an attribute's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the column is unknown, the array has the wrong
    /// type or shape, or its row count differs from the owning dimension.
    pub fn set_attribute(&mut self, name: &str, array: Array) -> Result<()> {
        let ctx = || ErrorContext::new("set_attribute").with_column(name);
        let expected = self
            .dimension(self.attribute(name).map_err(|e| e.with_context(ctx()))?.dim())?;
        if array.rows() != expected {
            return Err(Error::size_mismatch(format!("attribute {name}"), expected, array.rows())
                .with_context(ctx()));
        }
        match self.columns.get_mut(name) {
            Some(Column::Attribute(column)) => column.set(array).map_err(|e| e.with_context(ctx())),
            _ => Err(Error::unknown_column(name)),
        }
    }

    /// Overwrites a relation's values, flat and row-major.
    ///
    /// # Errors
    ///
    /// Returns an error if the relation is unknown, the row count differs
    /// from the owning dimension, or a value is outside the index domain.
    pub fn set_relation(&mut self, name: &str, values: Vec<usize>) -> Result<()> {
        let ctx = || ErrorContext::new("set_relation").with_column(name);
        let relation = self.relation(name).map_err(|e| e.with_context(ctx()))?;
        let expected = self.dimension(relation.dim())? * relation.width();
        if values.len() != expected {
            return Err(
                Error::size_mismatch(format!("relation {name} values"), expected, values.len())
                    .with_context(ctx()),
            );
        }
        match self.columns.get_mut(name) {
            Some(Column::Relation(column)) => column.set(values).map_err(|e| e.with_context(ctx())),
            _ => Err(Error::unknown_column(name)),
        }
    }

    /// Overwrites a field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is unknown or the value does not match
    /// its declaration.
    pub fn set_field(&mut self, name: &str, value: Array) -> Result<()> {
        match self.columns.get_mut(name) {
            Some(Column::Field(column)) => column
                .set(value)
                .map_err(|e| e.with_context(ErrorContext::new("set_field").with_column(name))),
            _ => Err(Error::unknown_column(name)),
        }
    }

    /// Creates or replaces the map `child -> group`.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is unknown, the array length
    /// differs from the child dimension, or a value is not a valid group row.
    pub fn set_map(&mut self, child: &str, group: &str, values: Vec<usize>) -> Result<()> {
        let ctx = || ErrorContext::new("set_map").with_dimension(child);
        let child_size = self.dimension(child).map_err(|e| e.with_context(ctx()))?;
        let group_size = self.dimension(group).map_err(|e| e.with_context(ctx()))?;
        let key = MapKey::new(child, group);
        if values.len() != child_size {
            return Err(
                Error::size_mismatch(format!("map {key}"), child_size, values.len())
                    .with_context(ctx()),
            );
        }
        let mut column = key.column(group_size);
        column.set(values).map_err(|e| e.with_context(ctx()))?;
        self.maps.insert(key, column);
        Ok(())
    }

    /// Replaces this store's contents with a deep copy of `other`.
    ///
    /// # Errors
    ///
    /// Returns an error if the two stores have different schemas.
    pub fn copy_from(&mut self, other: &Self) -> Result<()> {
        self.require_same_schema(other)?;
        *self = other.clone();
        Ok(())
    }

    /// Verifies both store invariants and every column length.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_integrity(&self) -> Result<()> {
        for column in self.columns.values() {
            match column {
                Column::Attribute(a) => {
                    let expected = self.dimension(a.dim())?;
                    let populated_ok = a.values().is_some() || expected == 0;
                    if a.size() != expected || !populated_ok {
                        return Err(Error::size_mismatch(
                            format!("attribute {}", a.name()),
                            expected,
                            a.size(),
                        ));
                    }
                }
                Column::Relation(r) => self.check_index_column(r)?,
                Column::Field(_) => {}
            }
        }
        for column in self.maps.values() {
            self.check_index_column(column)?;
        }
        Ok(())
    }

    pub(crate) fn check_index_column(&self, column: &RelationColumn) -> Result<()> {
        let rows = self.dimension(column.dim())?;
        if column.size() != rows {
            return Err(Error::size_mismatch(
                format!("rows of {}", column.name()),
                rows,
                column.size(),
            ));
        }
        let target = self.dimension(column.target())?;
        if column.index().len() != target || column.index().iter().enumerate().any(|(i, &v)| i != v) {
            return Err(Error::new(ErrorKind::Internal(format!(
                "index domain of {} is not 0..{target}",
                column.name()
            ))));
        }
        if let Some(bad) = column.first_outside_domain() {
            return Err(Error::dangling(column.name(), bad));
        }
        Ok(())
    }

    pub(crate) fn require_same_schema(&self, other: &Self) -> Result<()> {
        if Arc::ptr_eq(&self.schema, &other.schema) || self.schema == other.schema {
            Ok(())
        } else {
            Err(Error::schema(format!(
                "expected a {} store, got a {} store",
                self.schema.name(),
                other.schema.name()
            )))
        }
    }

    pub(crate) fn size_of(&self, dim: &str) -> usize {
        self.dimensions.get(dim).copied().unwrap_or(0)
    }

    /// Applies `f` to every column in place.
    pub(crate) fn update_columns(
        &mut self,
        mut f: impl FnMut(&mut Column) -> Result<()>,
    ) -> Result<()> {
        let names: Vec<String> = self.columns.keys().cloned().collect();
        for name in names {
            if let Some(column) = self.columns.get_mut(&name) {
                f(column)?;
            }
        }
        Ok(())
    }

    /// Applies `f` to every map in place.
    pub(crate) fn update_maps(
        &mut self,
        mut f: impl FnMut(&mut RelationColumn) -> Result<()>,
    ) -> Result<()> {
        let keys: Vec<MapKey> = self.maps.keys().cloned().collect();
        for key in keys {
            if let Some(map) = self.maps.get_mut(&key) {
                f(map)?;
            }
        }
        Ok(())
    }

    pub(crate) fn relations(&self) -> impl Iterator<Item = &RelationColumn> + '_ {
        self.columns.values().filter_map(Column::as_relation)
    }
}

impl fmt::Display for EntityStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Entity {}>", self.schema.name())?;
        write!(f, "  Dimensions:")?;
        for (name, size) in &self.dimensions {
            write!(f, " {name}={size}")?;
        }
        writeln!(f)?;
        for column in self.columns.values() {
            match column {
                Column::Attribute(a) => {
                    writeln!(f, "  attribute {} [{}; {}]", a.name(), a.dim(), a.size())?;
                }
                Column::Relation(r) => writeln!(
                    f,
                    "  relation {} [{} -> {}; {}]",
                    r.name(),
                    r.dim(),
                    r.target(),
                    r.size()
                )?,
                Column::Field(c) => writeln!(f, "  field {} {}", c.name(), c.shape())?,
            }
        }
        for key in self.maps.keys() {
            writeln!(f, "  map {key}")?;
        }
        Ok(())
    }
}

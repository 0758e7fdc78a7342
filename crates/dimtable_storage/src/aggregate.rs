//! Aggregation of stores: building parents from children, concatenating
//! same-schema stores, and extracting one child back out.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use dimtable_foundation::{Error, ErrorContext, ErrorKind, Result};
use log::debug;

use crate::column::{AttributeColumn, Column, FieldColumn, RelationColumn};
use crate::schema::Schema;
use crate::store::{EntityStore, MapKey};

impl EntityStore {
    /// Aggregates `children` into one store of `schema`, with one row of
    /// `new_dimension` per child.
    ///
    /// Child columns are concatenated in order, relation values offset so
    /// they keep pointing at the same rows. Attributes owned by
    /// `new_dimension` take one row per child from the child's field of the
    /// same name. Every child dimension gains a map into `new_dimension`
    /// holding each child's position.
    ///
    /// # Errors
    ///
    /// Returns an error if the children do not share a schema or a child
    /// field does not fit the parent attribute built from it.
    pub fn from_entities(
        schema: Arc<Schema>,
        children: &[EntityStore],
        new_dimension: &str,
    ) -> Result<Self> {
        let ctx = || ErrorContext::new("from_entities").with_dimension(new_dimension);
        let Some(first) = children.first() else {
            let sizes = BTreeMap::from([(new_dimension.to_string(), 0)]);
            return Self::allocate(schema, &sizes);
        };
        for child in &children[1..] {
            first.require_same_schema(child).map_err(|e| e.with_context(ctx()))?;
        }

        let mut sizes: BTreeMap<String, usize> = BTreeMap::new();
        for child in children {
            for (dim, size) in child.dimensions() {
                *sizes.entry(dim.to_string()).or_insert(0) += size;
            }
        }
        sizes.insert(new_dimension.to_string(), children.len());

        let mut parent = Self::allocate(schema, &sizes)
            .map_err(|e| e.with_context(ctx()))?
            .with_config(first.config);
        let strategy = parent.config.remap;

        parent
            .update_columns(|column| {
                match column {
                    Column::Attribute(a) if a.dim() == new_dimension => {
                        let mut rows = a.sub(&[]);
                        for child in children {
                            match child.field(a.name()) {
                                Ok(field) => rows.append(&field_rows(field, a.dim())?)?,
                                Err(_) => rows.grow(1)?,
                            }
                        }
                        *a = rows;
                    }
                    Column::Attribute(a) => {
                        if let Ok(Column::Attribute(_)) = first.column(a.name()) {
                            let mut rows = a.sub(&[]);
                            for child in children {
                                rows.append(child.attribute(a.name())?)?;
                            }
                            *a = rows;
                        }
                    }
                    Column::Relation(r) => {
                        if let Ok(Column::Relation(_)) = first.column(r.name()) {
                            let target = r.target().to_string();
                            let mut rows = first.relation(r.name())?.clone();
                            for child in &children[1..] {
                                rows.append(child.relation(r.name())?, strategy)?;
                            }
                            if target == new_dimension {
                                rows.set_index((0..children.len()).collect());
                            }
                            *r = rows;
                        }
                    }
                    Column::Field(_) => {}
                }
                Ok(())
            })
            .map_err(|e| e.with_context(ctx()))?;

        for (key, map) in first.maps() {
            let mut rows = map.clone();
            for child in &children[1..] {
                rows.append(child.map(&key.child, &key.group)?, strategy)?;
            }
            parent.maps.insert(key.clone(), rows);
        }
        for (dim, _) in first.dimensions() {
            let key = MapKey::new(dim, new_dimension);
            let values = children
                .iter()
                .enumerate()
                .flat_map(|(i, child)| std::iter::repeat_n(i, child.size_of(dim)))
                .collect();
            let mut map = key.column(children.len());
            map.set(values).map_err(|e| e.with_context(ctx()))?;
            parent.maps.insert(key, map);
        }

        debug!(
            "from_entities: aggregated {} {} record(s) into {}",
            children.len(),
            first.schema.name(),
            parent.schema.name()
        );
        Ok(parent)
    }

    /// Returns a new store with `other`'s rows appended after this store's.
    ///
    /// Every dimension's size is the sum of both; relation and map values
    /// from `other` are offset by this store's target sizes. Fields always
    /// come from this store, even when it holds no rows yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the schemas differ, or if one side has a map the
    /// other lacks while owning rows of its child dimension.
    pub fn concat(&self, other: &Self) -> Result<Self> {
        let mut out = self.clone();
        out.concat_in_place(other)?;
        Ok(out)
    }

    /// In-place form of [`EntityStore::concat`].
    ///
    /// # Errors
    ///
    /// Same as [`EntityStore::concat`]. The store is unchanged on error.
    pub fn concat_in_place(&mut self, other: &Self) -> Result<()> {
        let ctx = || ErrorContext::new("concat");
        self.require_same_schema(other).map_err(|e| e.with_context(ctx()))?;
        if self.is_empty() {
            let mut next = other.clone().with_config(self.config);
            next.schema = self.schema.clone();
            for column in self.columns.values() {
                if let Column::Field(field) = column {
                    next.columns.insert(field.name().to_string(), column.clone());
                }
            }
            *self = next;
            return Ok(());
        }

        let mut next = self.clone();
        let strategy = next.config.remap;
        for (dim, size) in other.dimensions() {
            let total = next.size_of(dim) + size;
            next.dimensions.insert(dim.to_string(), total);
        }

        next.update_columns(|column| {
            match column {
                Column::Attribute(a) => a.append(other.attribute(a.name())?)?,
                Column::Relation(r) => r.append(other.relation(r.name())?, strategy)?,
                Column::Field(_) => {}
            }
            Ok(())
        })
        .map_err(|e| e.with_context(ctx()))?;

        let keys: BTreeSet<MapKey> = self.maps.keys().chain(other.maps.keys()).cloned().collect();
        for key in keys {
            let mut ours = self.map_or_empty(&key)?;
            ours.append(&other.map_or_empty(&key)?, strategy)?;
            next.maps.insert(key, ours);
        }

        *self = next;
        debug!(
            "concat: {} store now has dimensions {:?}",
            self.schema.name(),
            self.dimensions
        );
        Ok(())
    }

    /// Extracts the record at row `index` of `child_schema`'s dimension.
    ///
    /// Parent attributes owned by that dimension become child fields; rows
    /// of dimensions mapped into it become the child's rows, with relations
    /// renumbered into the child's own row ranges.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is past the end of the dimension.
    pub fn subentity(&self, child_schema: Arc<Schema>, index: usize) -> Result<Self> {
        let dim = child_schema.dimension().to_string();
        let ctx = || ErrorContext::new("subentity").with_dimension(dim.clone());
        let length = self.dimension(&dim).map_err(|e| e.with_context(ctx()))?;
        if index >= length {
            return Err(Error::new(ErrorKind::IndexOutOfBounds { index, length }).with_context(ctx()));
        }

        let sub = self.sub_dimension(vec![index], &dim, true)?;
        let sizes: BTreeMap<String, usize> = child_schema
            .dimensions()
            .into_iter()
            .map(|d| {
                let size = sub.size_of(&d);
                (d, size)
            })
            .collect();
        let mut child = Self::allocate(child_schema, &sizes)?.with_config(self.config);

        child.update_columns(|column| {
            match column {
                Column::Attribute(a) => {
                    if let Ok(source) = sub.attribute(a.name()) {
                        *a = source.clone();
                    }
                }
                Column::Relation(r) => {
                    if let Ok(source) = sub.relation(r.name()) {
                        *r = source.clone();
                    }
                }
                Column::Field(f) => match sub.column(f.name()) {
                    Ok(Column::Attribute(source)) if source.dim() == dim => {
                        *f = source.field(0)?;
                    }
                    Ok(Column::Field(source)) => *f = source.clone(),
                    _ => {}
                },
            }
            Ok(())
        })?;

        for (key, map) in sub.maps() {
            if key.child != dim && key.group != dim && sizes.contains_key(&key.child) {
                child.maps.insert(key.clone(), map.clone());
            }
        }
        Ok(child)
    }

    /// The map for `key`, or an empty one when this store owns no rows of
    /// its child dimension.
    fn map_or_empty(&self, key: &MapKey) -> Result<RelationColumn> {
        match self.maps.get(key) {
            Some(map) => Ok(map.clone()),
            None if self.size_of(&key.child) == 0 => Ok(key.column(self.size_of(&key.group))),
            None => Err(Error::new(ErrorKind::UnknownMap {
                child: key.child.clone(),
                group: key.group.clone(),
            })),
        }
    }
}

/// Reinterprets a field as a one-row attribute of `dim`.
fn field_rows(field: &FieldColumn, dim: &str) -> Result<AttributeColumn> {
    let mut column = AttributeColumn::new(
        field.name(),
        dim,
        field.element_type(),
        field.shape().clone(),
        field.element_type().default_value(),
    );
    column.set(field.value().clone())?;
    Ok(column)
}

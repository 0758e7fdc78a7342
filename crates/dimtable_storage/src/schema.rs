//! Schema descriptors for record types.
//!
//! Descriptors are pure metadata declared once per record type. A [`Schema`]
//! bundles them with a name lookup table built at declaration time, and is
//! shared read-only (behind an `Arc`) by every store of that record type.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use dimtable_foundation::{ElementType, Error, Result, Shape, Value};

use crate::column::{AttributeColumn, FieldColumn, RelationColumn};

/// Declaration of a per-row attribute.
#[derive(Clone, Debug, PartialEq)]
pub struct AttributeSchema {
    /// Column name (e.g. `r_array`).
    pub name: String,
    /// Owning dimension.
    pub dim: String,
    /// Element type.
    pub element_type: ElementType,
    /// Per-row shape.
    pub shape: Shape,
    /// Value for newly allocated rows; the type default if unset.
    pub default: Option<Value>,
}

impl AttributeSchema {
    /// Declares a scalar attribute owned by `dim`.
    #[must_use]
    pub fn new(name: impl Into<String>, dim: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            dim: dim.into(),
            element_type,
            shape: Shape::scalar(),
            default: None,
        }
    }

    /// Sets the per-row shape.
    #[must_use]
    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = shape.into();
        self
    }

    /// Sets the default for new rows.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Returns the value used for new rows.
    #[must_use]
    pub fn default_value(&self) -> Value {
        self.default
            .clone()
            .unwrap_or_else(|| self.element_type.default_value())
    }

    /// Creates a zero-sized instance column.
    #[must_use]
    pub fn create(&self) -> AttributeColumn {
        AttributeColumn::new(
            self.name.clone(),
            self.dim.clone(),
            self.element_type,
            self.shape.clone(),
            self.default_value(),
        )
    }

    fn validate(&self) -> Result<()> {
        require_name("attribute", &self.name)?;
        if self.dim.is_empty() {
            return Err(Error::schema(format!(
                "attribute {} has no owning dimension",
                self.name
            )));
        }
        validate_value_type(&self.name, self.element_type, &self.shape, self.default.as_ref())
    }
}

/// Declaration of a relation: index rows owned by `dim` pointing into `target`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationSchema {
    /// Column name (e.g. `bonds`).
    pub name: String,
    /// Owning dimension.
    pub dim: String,
    /// Dimension whose rows the values reference.
    pub target: String,
    /// Per-row shape, e.g. `[2]` for a pairwise link.
    pub shape: Shape,
}

impl RelationSchema {
    /// Declares a scalar relation from `dim` into `target`.
    #[must_use]
    pub fn new(name: impl Into<String>, dim: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dim: dim.into(),
            target: target.into(),
            shape: Shape::scalar(),
        }
    }

    /// Sets the per-row shape.
    #[must_use]
    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = shape.into();
        self
    }

    /// Creates a zero-sized instance column with the given index domain.
    #[must_use]
    pub fn create(&self, index: Vec<usize>) -> RelationColumn {
        RelationColumn::new(
            self.name.clone(),
            self.dim.clone(),
            self.target.clone(),
            self.shape.clone(),
            index,
        )
    }

    fn validate(&self) -> Result<()> {
        require_name("relation", &self.name)?;
        if self.dim.is_empty() {
            return Err(Error::schema(format!(
                "relation {} has no owning dimension",
                self.name
            )));
        }
        if self.target.is_empty() {
            return Err(Error::schema(format!(
                "relation {} has no target dimension",
                self.name
            )));
        }
        if self.shape.width() == 0 {
            return Err(Error::schema(format!(
                "relation {} has an empty row shape",
                self.name
            )));
        }
        Ok(())
    }
}

/// Declaration of a dimensionless field.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldSchema {
    /// Field name.
    pub name: String,
    /// Element type.
    pub element_type: ElementType,
    /// Shape of the value.
    pub shape: Shape,
    /// Initial value; the type default if unset.
    pub default: Option<Value>,
}

impl FieldSchema {
    /// Declares a scalar field.
    #[must_use]
    pub fn new(name: impl Into<String>, element_type: ElementType) -> Self {
        Self {
            name: name.into(),
            element_type,
            shape: Shape::scalar(),
            default: None,
        }
    }

    /// Sets the shape of the value.
    #[must_use]
    pub fn with_shape(mut self, shape: impl Into<Shape>) -> Self {
        self.shape = shape.into();
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Creates an instance column holding the default.
    #[must_use]
    pub fn create(&self) -> FieldColumn {
        FieldColumn::new(
            self.name.clone(),
            self.element_type,
            self.shape.clone(),
            self.default
                .clone()
                .unwrap_or_else(|| self.element_type.default_value()),
        )
    }

    fn validate(&self) -> Result<()> {
        require_name("field", &self.name)?;
        validate_value_type(&self.name, self.element_type, &self.shape, self.default.as_ref())
    }
}

/// The kind of a named column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Per-row values.
    Attribute,
    /// Per-row indices into another dimension.
    Relation,
    /// Dimensionless value.
    Field,
}

/// The full declaration of a record type.
#[derive(Clone, Debug, PartialEq)]
pub struct Schema {
    name: String,
    dimension: String,
    attributes: Vec<AttributeSchema>,
    relations: Vec<RelationSchema>,
    fields: Vec<FieldSchema>,
    lookup: HashMap<String, (ColumnKind, usize)>,
}

impl Schema {
    /// Starts declaring a record type.
    ///
    /// `dimension` is the dimension one instance of this record occupies
    /// when aggregated into a parent (e.g. `molecule` for a molecule).
    #[must_use]
    pub fn new(name: impl Into<String>, dimension: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimension: dimension.into(),
            attributes: Vec::new(),
            relations: Vec::new(),
            fields: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeSchema) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds a relation.
    #[must_use]
    pub fn with_relation(mut self, relation: RelationSchema) -> Self {
        self.relations.push(relation);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the declaration and builds the name lookup table.
    ///
    /// # Errors
    ///
    /// Returns a schema error if a descriptor lacks a name or owning
    /// dimension, a relation lacks its target, a default has the wrong type,
    /// or two columns share a name.
    pub fn build(mut self) -> Result<Arc<Self>> {
        require_name("record type", &self.name)?;
        if self.dimension.is_empty() {
            return Err(Error::schema(format!(
                "record type {} has no dimension",
                self.name
            )));
        }

        let mut lookup = HashMap::new();
        let names = self
            .attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.name.clone(), (ColumnKind::Attribute, i), a.validate()))
            .chain(self.relations.iter().enumerate().map(|(i, r)| {
                (r.name.clone(), (ColumnKind::Relation, i), r.validate())
            }))
            .chain(
                self.fields
                    .iter()
                    .enumerate()
                    .map(|(i, f)| (f.name.clone(), (ColumnKind::Field, i), f.validate())),
            );
        for (name, slot, valid) in names {
            valid?;
            if lookup.insert(name.clone(), slot).is_some() {
                return Err(Error::schema(format!("column {name} declared twice")));
            }
        }

        self.lookup = lookup;
        Ok(Arc::new(self))
    }

    /// Returns the record type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the dimension a record of this type occupies in a parent.
    #[must_use]
    pub fn dimension(&self) -> &str {
        &self.dimension
    }

    /// Returns every attribute declaration.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeSchema] {
        &self.attributes
    }

    /// Returns every relation declaration.
    #[must_use]
    pub fn relations(&self) -> &[RelationSchema] {
        &self.relations
    }

    /// Returns every field declaration.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Returns the kind of the named column.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.lookup.get(name).map(|(kind, _)| *kind)
    }

    /// Looks up an attribute declaration by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&AttributeSchema> {
        match self.lookup.get(name) {
            Some((ColumnKind::Attribute, i)) => self.attributes.get(*i),
            _ => None,
        }
    }

    /// Looks up a relation declaration by name.
    #[must_use]
    pub fn relation(&self, name: &str) -> Option<&RelationSchema> {
        match self.lookup.get(name) {
            Some((ColumnKind::Relation, i)) => self.relations.get(*i),
            _ => None,
        }
    }

    /// Looks up a field declaration by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        match self.lookup.get(name) {
            Some((ColumnKind::Field, i)) => self.fields.get(*i),
            _ => None,
        }
    }

    /// Returns every dimension that owns a column or is referenced by one.
    #[must_use]
    pub fn dimensions(&self) -> BTreeSet<String> {
        self.attributes
            .iter()
            .map(|a| a.dim.clone())
            .chain(self.relations.iter().map(|r| r.dim.clone()))
            .chain(self.relations.iter().map(|r| r.target.clone()))
            .collect()
    }
}

fn require_name(what: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::schema(format!("{what} declared without a name")));
    }
    Ok(())
}

fn validate_value_type(
    name: &str,
    element_type: ElementType,
    shape: &Shape,
    default: Option<&Value>,
) -> Result<()> {
    if shape.width() == 0 {
        return Err(Error::schema(format!("{name} has an empty shape")));
    }
    if let Some(default) = default {
        if default.element_type() != element_type {
            return Err(Error::type_mismatch(name, element_type, default.element_type()));
        }
    }
    Ok(())
}

//! Deferred aggregation of child records.
//!
//! Appending children one at a time with [`EntityStore::concat_in_place`]
//! copies the whole store on every call. A [`Batch`] collects them instead
//! and aggregates once when the building scope ends.

use log::debug;

use dimtable_foundation::{ErrorContext, Result};

use crate::store::EntityStore;

/// Children collected for a single aggregation.
#[derive(Debug, Default)]
pub struct Batch {
    children: Vec<EntityStore>,
}

impl Batch {
    /// Queues a child record.
    pub fn append(&mut self, child: EntityStore) {
        self.children.push(child);
    }

    /// Returns the number of queued children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if nothing has been queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl EntityStore {
    /// Runs `build` to queue children, then appends them all at once.
    ///
    /// The children are aggregated along their schema's own dimension and
    /// concatenated onto this store exactly once, however many were queued.
    /// If `build` fails nothing is appended.
    ///
    /// # Errors
    ///
    /// Returns the error from `build`, or from aggregating the children.
    pub fn batch<F>(&mut self, build: F) -> Result<()>
    where
        F: FnOnce(&mut Batch) -> Result<()>,
    {
        let mut batch = Batch::default();
        build(&mut batch)?;
        self.flush(batch)
    }

    /// Appends a single child record.
    ///
    /// # Errors
    ///
    /// Returns an error if the child cannot be aggregated into this store.
    pub fn add_entity(&mut self, child: EntityStore) -> Result<()> {
        self.batch(|batch| {
            batch.append(child);
            Ok(())
        })
    }

    fn flush(&mut self, batch: Batch) -> Result<()> {
        let Some(first) = batch.children.first() else {
            return Ok(());
        };
        let dimension = first.schema().dimension().to_string();
        let ctx = || ErrorContext::new("batch").with_dimension(dimension.clone());
        let aggregate = Self::from_entities(self.schema.clone(), &batch.children, &dimension)
            .map_err(|e| e.with_context(ctx()))?
            .with_config(self.config);
        self.concat_in_place(&aggregate)
            .map_err(|e| e.with_context(ctx()))?;
        debug!("batch: appended {} record(s) along {dimension}", batch.len());
        Ok(())
    }
}

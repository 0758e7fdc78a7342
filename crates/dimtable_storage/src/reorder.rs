//! Reordering a dimension, with contingent reordering of grouped dimensions.

use std::collections::{BTreeMap, VecDeque};

use dimtable_foundation::{ErrorContext, Result};
use log::{debug, trace};

use crate::column::{Column, RelationColumn, check_permutation};
use crate::store::EntityStore;

/// Stable argsort of `keys`.
fn argsort(keys: &[usize]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..keys.len()).collect();
    order.sort_by_key(|&i| keys[i]);
    order
}

/// Inverse permutation: `position[old] = new`.
fn invert(order: &[usize]) -> Vec<usize> {
    let mut position = vec![0; order.len()];
    for (new, &old) in order.iter().enumerate() {
        position[old] = new;
    }
    position
}

impl EntityStore {
    /// Permutes `dimension` so that new row `i` is old row `order[i]`.
    ///
    /// Relation and map values pointing into the dimension follow their
    /// rows. Every dimension grouped by it (directly or through further
    /// maps) is rearranged so each group's children stay contiguous and
    /// follow the new group order; within a group, children keep their
    /// relative order.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is unknown or `order` is not a
    /// permutation of its rows. The store is unchanged on error.
    pub fn reorder_dimension(&mut self, order: &[usize], dimension: &str) -> Result<()> {
        let ctx = || ErrorContext::new("reorder_dimension").with_dimension(dimension);
        let size = self.dimension(dimension).map_err(|e| e.with_context(ctx()))?;
        check_permutation(order, size).map_err(|e| e.with_context(ctx()))?;

        let orders = self.contingent_orders(order, dimension);
        let strategy = self.config.remap;
        let fresh: BTreeMap<&str, Vec<usize>> = orders
            .iter()
            .map(|(dim, o)| (dim.as_str(), (0..o.len()).collect()))
            .collect();

        let apply = |rel: &mut RelationColumn| -> Result<()> {
            if let Some(rows) = orders.get(rel.dim()) {
                rel.reorder(rows)?;
            }
            if let (Some(old), Some(new)) = (orders.get(rel.target()), fresh.get(rel.target())) {
                rel.remap(old, new, strategy)?;
            }
            Ok(())
        };

        let mut next = self.clone();
        next.update_columns(|column| match column {
            Column::Attribute(a) => match orders.get(a.dim()) {
                Some(rows) => a.reorder(rows),
                None => Ok(()),
            },
            Column::Relation(r) => apply(r),
            Column::Field(_) => Ok(()),
        })?;
        next.update_maps(|map| apply(map))?;
        *self = next;

        debug!(
            "reorder_dimension: reordered {dimension} and {} grouped dimension(s)",
            orders.len() - 1
        );
        Ok(())
    }

    /// Row orders for `dimension` and every dimension grouped under it.
    fn contingent_orders(&self, order: &[usize], dimension: &str) -> BTreeMap<String, Vec<usize>> {
        let mut orders = BTreeMap::from([(dimension.to_string(), order.to_vec())]);
        let mut queue = VecDeque::from([dimension.to_string()]);

        while let Some(group) = queue.pop_front() {
            let position = invert(&orders[&group]);
            for (key, map) in &self.maps {
                if key.group != group || orders.contains_key(&key.child) {
                    continue;
                }
                let keys: Vec<usize> = map.values().iter().map(|&g| position[g]).collect();
                trace!("reorder: {} follows {group}", key.child);
                orders.insert(key.child.clone(), argsort(&keys));
                queue.push_back(key.child.clone());
            }
        }
        orders
    }
}

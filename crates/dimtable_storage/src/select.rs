//! Cascading selection across the dimension graph.
//!
//! A selection on one dimension narrows every dimension connected to it:
//! - relation target -> owner: an owner row survives only if every value it
//!   references survives
//! - group -> child: a child row survives only if its group survives
//! - child -> group: a group survives only if some selected child maps to it
//! - owner -> target (optional): a target row survives only if a surviving
//!   relation row references it
//!
//! A dimension counts as selected when it was seeded or narrowed by the
//! owner -> target or child -> group rules, so touched groups carry on up
//! through nested maps. Children that merely lost rows to the other rules
//! never remove groups: a group without bonds keeps its atoms.
//!
//! Every rule only ever removes rows, so applying them from a worklist
//! reaches a fixed point.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use dimtable_foundation::{Error, ErrorContext, Result, Selection};
use log::{debug, trace};

use crate::column::{Column, RelationColumn};
use crate::store::EntityStore;

/// Per-dimension keep masks while a selection is being propagated.
struct Masks(BTreeMap<String, Vec<bool>>);

impl Masks {
    fn full(store: &EntityStore) -> Self {
        Self(
            store
                .dimensions
                .iter()
                .map(|(dim, &size)| (dim.clone(), vec![true; size]))
                .collect(),
        )
    }

    fn get(&self, dim: &str) -> &[bool] {
        self.0.get(dim).map_or(&[][..], Vec::as_slice)
    }

    /// Intersects `dim` with `keep`; true if any row was removed.
    fn narrow(&mut self, dim: &str, keep: &[bool]) -> bool {
        let Some(mask) = self.0.get_mut(dim) else {
            return false;
        };
        let mut changed = false;
        for (slot, &k) in mask.iter_mut().zip(keep) {
            if *slot && !k {
                *slot = false;
                changed = true;
            }
        }
        changed
    }

    fn into_rows(self) -> BTreeMap<String, Vec<usize>> {
        self.0
            .into_iter()
            .map(|(dim, mask)| {
                let rows = mask
                    .iter()
                    .enumerate()
                    .filter_map(|(i, &k)| k.then_some(i))
                    .collect();
                (dim, rows)
            })
            .collect()
    }
}

/// Rows of `dim` allowed to survive, as derived from a neighbour.
struct Constraint {
    dim: String,
    keep: Vec<bool>,
    /// Whether the surviving rows count as selected rather than filtered.
    selects: bool,
}

impl Constraint {
    fn new(dim: &str, keep: Vec<bool>) -> Self {
        Self {
            dim: dim.to_string(),
            keep,
            selects: false,
        }
    }
}

/// Owner rows of `rel` whose every value is kept in `target_mask`.
fn contained_rows(rel: &RelationColumn, target_mask: &[bool], owner_size: usize) -> Vec<bool> {
    let mut keep = rel.argument_filter(target_mask);
    keep.resize(owner_size, false);
    keep
}

/// Target rows referenced by kept owner rows of `rel`.
fn referenced_rows(rel: &RelationColumn, owner_mask: &[bool], target_size: usize) -> Vec<bool> {
    let mut keep = vec![false; target_size];
    for row in (0..rel.size()).filter(|&r| owner_mask.get(r).copied().unwrap_or(false)) {
        for &v in rel.row(row) {
            if let Some(slot) = keep.get_mut(v) {
                *slot = true;
            }
        }
    }
    keep
}

impl EntityStore {
    /// Computes the rows every dimension keeps when `dimension` is
    /// restricted to `selection`.
    ///
    /// The result holds sorted row lists for every dimension, including
    /// those left whole.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimension is unknown or the selection does
    /// not fit it.
    pub fn propagate(
        &self,
        selection: impl Into<Selection>,
        dimension: &str,
    ) -> Result<BTreeMap<String, Vec<usize>>> {
        let seed = self.seed(selection.into(), dimension, "propagate")?;
        Ok(self.fixed_point(BTreeMap::from([(dimension.to_string(), seed)])).into_rows())
    }

    /// Returns a new store restricted to `selection` along `dimension`.
    ///
    /// With `propagate`, every connected dimension is narrowed to stay
    /// consistent. Without it, only `dimension` is filtered, together with
    /// the relation rows that referenced removed rows and the maps it owns;
    /// everything else stays untouched.
    ///
    /// Relation rows that no longer resolve are dropped, never reported.
    ///
    /// # Errors
    ///
    /// Returns an error if the selection does not fit the dimension, or if
    /// a non-propagating selection removes groups that still have children.
    pub fn sub_dimension(
        &self,
        selection: impl Into<Selection>,
        dimension: &str,
        propagate: bool,
    ) -> Result<Self> {
        let seed = self.seed(selection.into(), dimension, "sub_dimension")?;
        let masks = if propagate {
            self.fixed_point(BTreeMap::from([(dimension.to_string(), seed)]))
        } else {
            self.single_step(dimension, &seed)
        };
        let result = self.rebuild(&masks.into_rows())?;
        debug!(
            "sub_dimension: {} rows of {dimension} kept (propagate = {propagate})",
            result.size_of(dimension)
        );
        Ok(result)
    }

    /// Restricts several dimensions at once, then propagates.
    pub(crate) fn sub_dimensions(&self, seeds: BTreeMap<String, Vec<bool>>) -> Result<Self> {
        self.rebuild(&self.fixed_point(seeds).into_rows())
    }

    fn seed(&self, selection: Selection, dimension: &str, op: &str) -> Result<Vec<bool>> {
        let ctx = || ErrorContext::new(op).with_dimension(dimension);
        let size = self.dimension(dimension).map_err(|e| e.with_context(ctx()))?;
        selection.to_mask(size).map_err(|e| e.with_context(ctx()))
    }

    fn fixed_point(&self, seeds: BTreeMap<String, Vec<bool>>) -> Masks {
        let mut masks = Masks::full(self);
        let mut selected: BTreeSet<String> = BTreeSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        for (dim, seed) in &seeds {
            masks.narrow(dim, seed);
            selected.insert(dim.clone());
            queue.push_back(dim.clone());
        }

        while let Some(dim) = queue.pop_front() {
            let constraints = self.constraints_from(&dim, &masks, selected.contains(&dim));
            for Constraint { dim: next, keep, selects } in constraints {
                let newly_selected = selects && selected.insert(next.clone());
                if masks.narrow(&next, &keep) || newly_selected {
                    trace!("propagate: {dim} narrowed {next}");
                    if !queue.contains(&next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        masks
    }

    fn single_step(&self, dimension: &str, seed: &[bool]) -> Masks {
        let mut masks = Masks::full(self);
        masks.narrow(dimension, seed);
        for rel in self.relations().filter(|r| r.target() == dimension) {
            let keep = contained_rows(rel, masks.get(dimension), self.size_of(rel.dim()));
            masks.narrow(rel.dim(), &keep);
        }
        masks
    }

    /// Every constraint a change to `dim` places on a neighbouring dimension.
    fn constraints_from(&self, dim: &str, masks: &Masks, selected: bool) -> Vec<Constraint> {
        let mut out = Vec::new();
        let current = masks.get(dim);

        for rel in self.relations() {
            if rel.target() == dim {
                let keep = contained_rows(rel, current, self.size_of(rel.dim()));
                out.push(Constraint::new(rel.dim(), keep));
            }
            if self.config.propagate_relations_upward && rel.dim() == dim {
                let keep = referenced_rows(rel, current, self.size_of(rel.target()));
                out.push(Constraint {
                    selects: true,
                    ..Constraint::new(rel.target(), keep)
                });
            }
        }

        for (key, map) in &self.maps {
            if key.group == dim {
                let keep = contained_rows(map, current, self.size_of(&key.child));
                out.push(Constraint::new(&key.child, keep));
            }
            if selected && key.child == dim {
                let keep = referenced_rows(map, current, self.size_of(&key.group));
                out.push(Constraint {
                    selects: true,
                    ..Constraint::new(&key.group, keep)
                });
            }
        }
        out
    }

    /// Builds the store holding only `rows` of every dimension.
    fn rebuild(&self, rows: &BTreeMap<String, Vec<usize>>) -> Result<Self> {
        let strategy = self.config.remap;
        let changed = |dim: &str| -> Option<&[usize]> {
            rows.get(dim)
                .map(Vec::as_slice)
                .filter(|r| r.len() != self.size_of(dim))
        };

        for (key, map) in &self.maps {
            let Some(groups) = changed(&key.group) else {
                continue;
            };
            let mut kept = vec![false; self.size_of(&key.group)];
            for &g in groups {
                kept[g] = true;
            }
            let child_rows = rows.get(&key.child).map_or(&[][..], Vec::as_slice);
            if let Some(&orphan) = child_rows
                .iter()
                .map(|&r| &map.row(r)[0])
                .find(|&&g| !kept.get(g).copied().unwrap_or(false))
            {
                return Err(Error::dangling(key.to_string(), orphan).with_context(
                    ErrorContext::new("sub_dimension").with_dimension(key.group.clone()),
                ));
            }
        }

        let mut out = self.clone();
        for (dim, kept) in rows {
            out.dimensions.insert(dim.clone(), kept.len());
        }

        let narrow = |rel: &mut RelationColumn| -> Result<()> {
            if let Some(owned) = changed(rel.dim()) {
                *rel = rel.sub(owned);
            }
            if let Some(targets) = changed(rel.target()) {
                rel.set_index(targets.to_vec());
                rel.reindex(strategy)?;
            }
            Ok(())
        };

        out.update_columns(|column| {
            match column {
                Column::Attribute(a) => {
                    if let Some(owned) = changed(a.dim()) {
                        *a = a.sub(owned);
                    }
                }
                Column::Relation(r) => narrow(r)?,
                Column::Field(_) => {}
            }
            Ok(())
        })?;
        out.update_maps(|map| narrow(map))?;
        Ok(out)
    }
}

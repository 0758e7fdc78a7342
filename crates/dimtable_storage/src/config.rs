//! Per-store configuration.

use dimtable_foundation::RemapStrategy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunables carried by every [`crate::EntityStore`].
///
/// Stores derived from another store (copies, selections, concatenations,
/// aggregations) inherit its configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoreConfig {
    /// Translation table strategy for relation and map remapping.
    pub remap: RemapStrategy,

    /// When true, selecting rows of a relation's owning dimension also
    /// restricts its target dimension to the rows the surviving relation
    /// rows reference. Off by default: only the target-to-owner rule runs.
    pub propagate_relations_upward: bool,
}

impl StoreConfig {
    /// Always uses hash-map remapping; for stores with very sparse indices.
    #[must_use]
    pub fn sparse() -> Self {
        Self {
            remap: RemapStrategy::Sparse,
            ..Self::default()
        }
    }

    /// Sets the remap strategy.
    #[must_use]
    pub fn with_remap(mut self, remap: RemapStrategy) -> Self {
        self.remap = remap;
        self
    }

    /// Enables or disables upward relation propagation.
    #[must_use]
    pub fn with_upward_propagation(mut self, enabled: bool) -> Self {
        self.propagate_relations_upward = enabled;
        self
    }
}

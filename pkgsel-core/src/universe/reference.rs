//! Reference path sets.
//!
//! A reference set is a fixed collection of import paths, typically the
//! packages of a toolchain's standard library, that callers subtract from
//! results. It is loaded from its own snapshot and matched by path, so it
//! works across universes.

use super::{PackageId, Universe};
use crate::set::PackageSet;
use std::collections::HashSet;

/// Import paths to drop from results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceSet {
    paths: HashSet<String>,
}

impl ReferenceSet {
    /// Every path present in `universe`, variants included.
    #[must_use]
    pub fn from_universe(universe: &dyn Universe) -> Self {
        universe
            .ids()
            .filter_map(|id| universe.package(id))
            .map(|package| package.path.clone())
            .collect()
    }

    /// Number of distinct paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// True when no path is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// True when `path` belongs to the reference set.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Members of `set` whose path is not in the reference set.
    #[must_use]
    pub fn subtract(&self, set: &PackageSet, universe: &dyn Universe) -> PackageSet {
        set.iter()
            .filter(|id| !self.is_reference(*id, universe))
            .collect()
    }

    fn is_reference(&self, id: PackageId, universe: &dyn Universe) -> bool {
        universe
            .package(id)
            .is_some_and(|package| self.contains(&package.path))
    }
}

impl FromIterator<String> for ReferenceSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().collect(),
        }
    }
}

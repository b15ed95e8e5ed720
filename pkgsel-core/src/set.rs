//! Package sets: the value every expression evaluates to.

use crate::universe::{PackageId, Universe};
use std::collections::hash_set;
use std::collections::HashSet;

/// Unordered set of unique package identifiers.
///
/// Iteration order is unspecified. Use [`sorted`](Self::sorted) for a
/// deterministic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageSet {
    ids: HashSet<PackageId>,
}

impl PackageSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set holding one package.
    #[must_use]
    pub fn singleton(id: PackageId) -> Self {
        Self {
            ids: HashSet::from([id]),
        }
    }

    /// Number of packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True for the empty set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, id: PackageId) -> bool {
        self.ids.contains(&id)
    }

    /// Add a package; returns false if it was already present.
    pub fn insert(&mut self, id: PackageId) -> bool {
        self.ids.insert(id)
    }

    /// Iterate over members in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = PackageId> + '_ {
        self.ids.iter().copied()
    }

    /// In-place union, consuming `other`.
    pub fn union_with(&mut self, other: Self) {
        if other.len() > self.len() {
            let smaller = std::mem::replace(self, other);
            self.ids.extend(smaller.ids);
        } else {
            self.ids.extend(other.ids);
        }
    }

    /// `self - other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.ids.difference(&other.ids).copied().collect()
    }

    /// `self ∩ other`.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let (small, large) = if self.len() <= other.len() {
            (self, other)
        } else {
            (other, self)
        };
        small
            .ids
            .iter()
            .copied()
            .filter(|id| large.contains(*id))
            .collect()
    }

    /// True when every member of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.ids.is_subset(&other.ids)
    }

    /// Members ordered by package identifier text, then by index.
    ///
    /// Ids the universe does not know sort first.
    #[must_use]
    pub fn sorted(&self, universe: &dyn Universe) -> Vec<PackageId> {
        let mut ids: Vec<PackageId> = self.iter().collect();
        ids.sort_by(|a, b| {
            let name = |id: &PackageId| universe.package(*id).map(|package| package.id.as_str());
            name(a).cmp(&name(b)).then(a.cmp(b))
        });
        ids
    }
}

impl FromIterator<PackageId> for PackageSet {
    fn from_iter<I: IntoIterator<Item = PackageId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<PackageId> for PackageSet {
    fn extend<I: IntoIterator<Item = PackageId>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl IntoIterator for PackageSet {
    type Item = PackageId;
    type IntoIter = hash_set::IntoIter<PackageId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

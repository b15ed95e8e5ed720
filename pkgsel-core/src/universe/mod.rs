//! Package universe: the immutable graph of known packages an expression is
//! evaluated against.
//!
//! The evaluator only talks to the [`Universe`] trait. [`Snapshot`] is the
//! in-memory implementation, built either with [`SnapshotBuilder`] or from
//! the JSON snapshot format via [`load_snapshot`].

pub mod loader;
pub mod reference;
pub mod snapshot;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use loader::{load_snapshot, PackageRecord, SnapshotError, SnapshotFile};
pub use reference::ReferenceSet;
pub use snapshot::{Snapshot, SnapshotBuilder};

/// Dense index of a package inside one universe.
///
/// Identifiers are only meaningful for the universe that issued them and
/// always fall in `0..universe.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackageId(u32);

impl PackageId {
    /// Identifier for the package stored at `index`.
    ///
    /// Universes larger than `u32::MAX` packages are not supported; the
    /// snapshot builder rejects them before any id is issued.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the package inside its universe.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Build module that owns a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    /// Module path, e.g. `acme.org`
    pub path: String,
    /// Resolved version, absent for local modules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Module lives in the working tree rather than a download cache
    #[serde(default)]
    pub local: bool,
}

/// One known build unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    /// Unique identifier; variants carry a decorated id
    pub id: String,
    /// Import path; a variant shares its counterpart's path
    pub path: String,
    /// Direct imports in declaration order
    pub imports: Vec<PackageId>,
    /// Non-variant counterpart when this package is a verification variant
    pub variant_of: Option<PackageId>,
    /// Owning module, used by formatters only
    pub module: Option<ModuleInfo>,
    /// Owning repository root, used by formatters only
    pub repository: Option<String>,
}

impl Package {
    /// True for verification variants such as test builds.
    #[must_use]
    pub const fn is_variant(&self) -> bool {
        self.variant_of.is_some()
    }
}

/// Read-only view of the package graph.
///
/// Implementations must be immutable for their whole lifetime so that
/// several evaluations can share one universe without coordination.
pub trait Universe: Send + Sync {
    /// Number of packages, variants included.
    fn len(&self) -> usize;

    /// True when the universe holds no packages.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Package stored under `id`.
    fn package(&self, id: PackageId) -> Option<&Package>;

    /// Resolve an exact import path to its non-variant package.
    fn lookup(&self, path: &str) -> Option<PackageId>;

    /// Non-variant packages whose path is `prefix` or nested under it.
    fn match_subtree(&self, prefix: &str) -> Vec<PackageId>;

    /// Every non-variant package.
    fn match_all(&self) -> Vec<PackageId>;

    /// Direct imports of `id` (empty for unknown ids).
    fn imports(&self, id: PackageId) -> &[PackageId];

    /// Non-variant counterpart of a verification variant.
    fn counterpart(&self, id: PackageId) -> Option<PackageId>;

    /// Verification variants built from `id`.
    fn variants_of(&self, id: PackageId) -> &[PackageId];

    /// True when `id` is a verification variant.
    fn is_variant(&self, id: PackageId) -> bool {
        self.counterpart(id).is_some()
    }

    /// Every identifier, variants included, in index order.
    fn ids(&self) -> Box<dyn Iterator<Item = PackageId> + '_> {
        let len = u32::try_from(self.len()).unwrap_or(u32::MAX);
        Box::new((0..len).map(PackageId::new))
    }
}

//! In-memory package universe.

use super::loader::{PackageRecord, SnapshotError, SnapshotFile};
use super::{ModuleInfo, Package, PackageId, Universe};
use crate::query::parser::path_in_subtree;
use std::collections::{BTreeMap, HashMap};
use std::ops::Bound;

/// Immutable, validated package graph.
///
/// `Snapshot` is `Send + Sync`; wrap it in an `Arc` to share it between
/// concurrent evaluations.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Packages indexed by `PackageId`
    packages: Vec<Package>,
    /// Identifier text to id
    by_id: HashMap<String, PackageId>,
    /// Non-variant import paths, ordered for prefix scans
    by_path: BTreeMap<String, PackageId>,
    /// Variants of each package, indexed by `PackageId`
    variants: Vec<Vec<PackageId>>,
}

impl Snapshot {
    /// Validate records and build the graph.
    ///
    /// # Errors
    /// Returns an integrity error for duplicate ids or non-variant paths,
    /// imports or counterparts naming unknown ids, and variants of variants.
    pub fn from_records(records: Vec<PackageRecord>) -> Result<Self, SnapshotError> {
        let count = records.len();
        if u32::try_from(count).is_err() {
            return Err(SnapshotError::TooLarge { count });
        }

        let mut by_id = HashMap::with_capacity(count);
        for (index, record) in records.iter().enumerate() {
            let id = PackageId::new(u32::try_from(index).unwrap_or(u32::MAX));
            if by_id.insert(record.id.clone(), id).is_some() {
                return Err(SnapshotError::DuplicateId {
                    id: record.id.clone(),
                });
            }
        }

        let resolve = |name: &str| by_id.get(name).copied();

        let mut packages = Vec::with_capacity(count);
        for record in &records {
            let imports = record
                .imports
                .iter()
                .map(|import| {
                    resolve(import).ok_or_else(|| SnapshotError::UnknownImport {
                        id: record.id.clone(),
                        import: import.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            let variant_of = match &record.variant_of {
                Some(target) => Some(resolve(target).ok_or_else(|| {
                    SnapshotError::UnknownCounterpart {
                        id: record.id.clone(),
                        target: target.clone(),
                    }
                })?),
                None => None,
            };

            packages.push(Package {
                id: record.id.clone(),
                path: record.path.clone(),
                imports,
                variant_of,
                module: record.module.clone(),
                repository: record.repository.clone(),
            });
        }

        let mut by_path = BTreeMap::new();
        let mut variants = vec![Vec::new(); count];
        for (index, package) in packages.iter().enumerate() {
            let id = PackageId::new(u32::try_from(index).unwrap_or(u32::MAX));
            match package.variant_of {
                Some(target) => {
                    let counterpart = &packages[target.index()];
                    if counterpart.is_variant() {
                        return Err(SnapshotError::NestedVariant {
                            id: package.id.clone(),
                            target: counterpart.id.clone(),
                        });
                    }
                    variants[target.index()].push(id);
                }
                None => {
                    if let Some(first) = by_path.insert(package.path.clone(), id) {
                        return Err(SnapshotError::DuplicatePath {
                            path: package.path.clone(),
                            first: packages[first.index()].id.clone(),
                            second: package.id.clone(),
                        });
                    }
                }
            }
        }

        tracing::debug!(
            target: "pkgsel::universe",
            packages = count,
            variants = count - by_path.len(),
            "built snapshot"
        );

        Ok(Self {
            packages,
            by_id,
            by_path,
            variants,
        })
    }

    /// Number of packages, variants included.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Resolve a package identifier (not a path).
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<PackageId> {
        self.by_id.get(id).copied()
    }

    /// All packages paired with their ids, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (PackageId, &Package)> + '_ {
        self.ids().zip(self.packages.iter())
    }

    /// Convert back to the on-disk layout.
    #[must_use]
    pub fn to_file(&self) -> SnapshotFile {
        let name = |id: PackageId| self.packages[id.index()].id.clone();
        let packages = self
            .packages
            .iter()
            .map(|package| PackageRecord {
                id: package.id.clone(),
                path: package.path.clone(),
                imports: package.imports.iter().copied().map(name).collect(),
                variant_of: package.variant_of.map(name),
                module: package.module.clone(),
                repository: package.repository.clone(),
            })
            .collect();
        SnapshotFile { packages }
    }
}

impl Universe for Snapshot {
    fn len(&self) -> usize {
        self.packages.len()
    }

    fn package(&self, id: PackageId) -> Option<&Package> {
        self.packages.get(id.index())
    }

    fn lookup(&self, path: &str) -> Option<PackageId> {
        self.by_path.get(path).copied()
    }

    fn match_subtree(&self, prefix: &str) -> Vec<PackageId> {
        self.by_path
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(path, _)| path.starts_with(prefix))
            .filter(|(path, _)| path_in_subtree(path, prefix))
            .map(|(_, id)| *id)
            .collect()
    }

    fn match_all(&self) -> Vec<PackageId> {
        self.by_path.values().copied().collect()
    }

    fn imports(&self, id: PackageId) -> &[PackageId] {
        self.packages
            .get(id.index())
            .map_or(&[], |package| package.imports.as_slice())
    }

    fn counterpart(&self, id: PackageId) -> Option<PackageId> {
        self.packages.get(id.index()).and_then(|package| package.variant_of)
    }

    fn variants_of(&self, id: PackageId) -> &[PackageId] {
        self.variants.get(id.index()).map_or(&[], Vec::as_slice)
    }
}

/// Fluent builder for snapshots assembled in code.
///
/// Records are validated only in [`build`](Self::build), so packages may be
/// added in any order.
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    records: Vec<PackageRecord>,
}

impl SnapshotBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a non-variant package whose id is its path.
    #[must_use]
    pub fn package(mut self, path: &str, imports: &[&str]) -> Self {
        let mut record = PackageRecord::new(path, path);
        record.imports = imports.iter().map(ToString::to_string).collect();
        self.records.push(record);
        self
    }

    /// Add a verification variant of `of`, sharing its path.
    #[must_use]
    pub fn variant(mut self, id: &str, of: &str, imports: &[&str]) -> Self {
        let path = self
            .records
            .iter()
            .find(|record| record.id == of)
            .map_or_else(|| of.to_string(), |record| record.path.clone());
        let mut record = PackageRecord::new(id, path);
        record.imports = imports.iter().map(ToString::to_string).collect();
        record.variant_of = Some(of.to_string());
        self.records.push(record);
        self
    }

    /// Set the module of the most recently added package.
    #[must_use]
    pub fn module(mut self, path: &str, version: Option<&str>) -> Self {
        if let Some(record) = self.records.last_mut() {
            record.module = Some(ModuleInfo {
                path: path.to_string(),
                version: version.map(ToString::to_string),
                local: version.is_none(),
            });
        }
        self
    }

    /// Set the repository of the most recently added package.
    #[must_use]
    pub fn repository(mut self, root: &str) -> Self {
        if let Some(record) = self.records.last_mut() {
            record.repository = Some(root.to_string());
        }
        self
    }

    /// Add a fully specified record.
    #[must_use]
    pub fn record(mut self, record: PackageRecord) -> Self {
        self.records.push(record);
        self
    }

    /// Validate and build.
    ///
    /// # Errors
    /// See [`Snapshot::from_records`].
    pub fn build(self) -> Result<Snapshot, SnapshotError> {
        Snapshot::from_records(self.records)
    }
}

//! Common test utilities for package-set query tests
//!
//! Seeded synthetic universes shared by the integration and property tests.

#![allow(dead_code)]
#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use pkgsel_core::universe::{PackageRecord, Snapshot, Universe};
use pkgsel_core::{PackageId, PackageSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Top-level module roots used by generated universes.
pub const ROOTS: [&str; 3] = ["acme.org", "example.com/kit", "lab.net"];

/// Small hand-written universe used by scenario tests.
///
/// ```text
/// acme.org/app -> acme.org/lib/http -> acme.org/lib/core
///              -> acme.org/lib/log  -> acme.org/lib/core
/// acme.org/tool -> acme.org/lib/log
/// acme.org/lib/http [test] -> acme.org/lib/core, acme.org/testutil
/// acme.org/testutil -> acme.org/lib/core
/// ```
#[must_use]
pub fn scenario_universe() -> Snapshot {
    pkgsel_core::SnapshotBuilder::new()
        .package("acme.org/app", &["acme.org/lib/http", "acme.org/lib/log"])
        .module("acme.org", None)
        .repository("acme.org")
        .package("acme.org/lib/http", &["acme.org/lib/core"])
        .package("acme.org/lib/log", &["acme.org/lib/core"])
        .package("acme.org/lib/core", &[])
        .package("acme.org/tool", &["acme.org/lib/log"])
        .package("acme.org/testutil", &["acme.org/lib/core"])
        .variant(
            "acme.org/lib/http [test]",
            "acme.org/lib/http",
            &["acme.org/lib/core", "acme.org/testutil"],
        )
        .build()
        .expect("scenario universe is well formed")
}

/// Generate a seeded random universe of `count` packages.
///
/// Imports only point at lower-numbered packages unless `cycles` is set, in
/// which case a few back edges are added. Roughly one package in five gets a
/// test variant.
#[must_use]
pub fn synthetic_universe(seed: u64, count: usize, cycles: bool) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(seed);
    let paths: Vec<String> = (0..count)
        .map(|index| {
            let root = ROOTS[index % ROOTS.len()];
            let group = rng.gen_range(0..4);
            format!("{root}/g{group}/p{index}")
        })
        .collect();

    let mut records = Vec::with_capacity(count + count / 5);
    for (index, path) in paths.iter().enumerate() {
        let mut record = PackageRecord::new(path.clone(), path.clone());
        if index > 0 {
            let fanout = rng.gen_range(0..=index.min(4));
            for _ in 0..fanout {
                let target = rng.gen_range(0..index);
                if !record.imports.contains(&paths[target]) {
                    record.imports.push(paths[target].clone());
                }
            }
        }
        if cycles && index + 1 < count && rng.gen_bool(0.1) {
            let target = rng.gen_range(index + 1..count);
            record.imports.push(paths[target].clone());
        }
        records.push(record);
    }

    for (index, path) in paths.iter().enumerate() {
        if rng.gen_bool(0.2) {
            let mut record = PackageRecord::new(format!("{path} [test]"), path.clone());
            record.variant_of = Some(path.clone());
            record.imports = records[index].imports.clone();
            if index > 0 {
                let extra = rng.gen_range(0..index);
                if !record.imports.contains(&paths[extra]) {
                    record.imports.push(paths[extra].clone());
                }
            }
            records.push(record);
        }
    }

    Snapshot::from_records(records).expect("synthetic universe is well formed")
}

/// Identifiers of `set` in deterministic order, for readable assertions.
#[must_use]
pub fn ids(universe: &Snapshot, set: &PackageSet) -> Vec<String> {
    set.sorted(universe)
        .into_iter()
        .map(|id| universe.package(id).unwrap().id.clone())
        .collect()
}

/// Every package reachable from `seed` by following imports, seed included.
///
/// Plain depth-first walk used as an oracle for the memoized index.
#[must_use]
pub fn reachable_from(universe: &dyn Universe, seed: PackageId) -> PackageSet {
    let mut seen = PackageSet::new();
    let mut stack = vec![seed];
    while let Some(id) = stack.pop() {
        if seen.insert(id) {
            stack.extend(universe.imports(id).iter().copied());
        }
    }
    seen
}

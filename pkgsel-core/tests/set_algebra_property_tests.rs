//! Property-based tests for the set algebra over synthetic universes.
//!
//! Expressions are generated as lists of leaves (exact paths, subtree
//! wildcards) rendered against a seeded universe, so every generated exact
//! path resolves and evaluation only fails on real bugs.

#![allow(clippy::unwrap_used)]

mod common;

use common::{reachable_from, synthetic_universe, ROOTS};
use pkgsel_core::query::{self, Catalog, EvalOptions};
use pkgsel_core::universe::{Snapshot, Universe};
use pkgsel_core::{EvalError, PackageSet, QueryError};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::sync::OnceLock;

const PACKAGES: usize = 60;

fn universe() -> &'static Snapshot {
    static UNIVERSE: OnceLock<Snapshot> = OnceLock::new();
    UNIVERSE.get_or_init(|| synthetic_universe(0x5eed, PACKAGES, true))
}

fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(Catalog::standard)
}

#[derive(Debug, Clone)]
enum Leaf {
    Exact(usize),
    Group(usize, usize),
    Root(usize),
}

impl Leaf {
    fn render(&self, universe: &Snapshot) -> String {
        match self {
            Self::Exact(index) => {
                let paths: Vec<&str> = universe
                    .iter()
                    .filter(|(_, package)| !package.is_variant())
                    .map(|(_, package)| package.path.as_str())
                    .collect();
                paths[index % paths.len()].to_string()
            }
            Self::Group(root, group) => format!("{}/g{group}/...", ROOTS[root % ROOTS.len()]),
            Self::Root(root) => format!("{}/...", ROOTS[root % ROOTS.len()]),
        }
    }
}

fn leaf() -> impl Strategy<Value = Leaf> {
    prop_oneof![
        4 => (0..PACKAGES).prop_map(Leaf::Exact),
        2 => (0..ROOTS.len(), 0..4usize).prop_map(|(root, group)| Leaf::Group(root, group)),
        1 => (0..ROOTS.len()).prop_map(Leaf::Root),
    ]
}

/// Juxtaposed leaves wrapped in parentheses, ready to splice into a larger
/// expression.
fn set_expr() -> impl Strategy<Value = Vec<Leaf>> {
    prop::collection::vec(leaf(), 1..5)
}

fn render(leaves: &[Leaf]) -> String {
    let universe = universe();
    let parts: Vec<String> = leaves.iter().map(|leaf| leaf.render(universe)).collect();
    format!("({})", parts.join(" "))
}

fn eval(source: &str) -> PackageSet {
    query::evaluate(source, catalog(), universe(), EvalOptions::strict())
        .unwrap_or_else(|err| panic!("'{source}' failed: {err}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_union_is_commutative(a in set_expr(), b in set_expr()) {
        let (a, b) = (render(&a), render(&b));
        prop_assert_eq!(eval(&format!("{a} + {b}")), eval(&format!("{b} + {a}")));
        prop_assert_eq!(eval(&format!("{a} {b}")), eval(&format!("{a} + {b}")));
    }

    #[test]
    fn prop_union_is_associative(a in set_expr(), b in set_expr(), c in set_expr()) {
        let (a, b, c) = (render(&a), render(&b), render(&c));
        prop_assert_eq!(
            eval(&format!("({a} + {b}) + {c}")),
            eval(&format!("{a} + ({b} + {c})"))
        );
    }

    #[test]
    fn prop_difference_with_self_is_empty(a in set_expr()) {
        let a = render(&a);
        let self_diff = format!("{a} - {a}");
        let all_self_diff = format!("{a}:all - {a}:all");
        prop_assert!(eval(&self_diff).is_empty());
        prop_assert!(eval(&all_self_diff).is_empty());
    }

    #[test]
    fn prop_difference_is_subset(a in set_expr(), b in set_expr()) {
        let (a, b) = (render(&a), render(&b));
        let left = eval(&a);
        let right = eval(&b);
        let diff = eval(&format!("{a} - {b}"));
        prop_assert!(diff.is_subset(&left));
        prop_assert!(diff.iter().all(|id| !right.contains(id)));
    }

    #[test]
    fn prop_closure_is_idempotent(a in set_expr()) {
        let a = render(&a);
        prop_assert_eq!(eval(&format!("{a}:all:all")), eval(&format!("{a}:all")));
    }

    #[test]
    fn prop_closure_matches_depth_first_walk(a in set_expr()) {
        let a = render(&a);
        let seeds = eval(&a);
        let mut expected = PackageSet::new();
        for seed in seeds.iter() {
            expected.union_with(reachable_from(universe(), seed));
        }
        prop_assert_eq!(eval(&format!("{a}:all")), expected);
    }

    #[test]
    fn prop_reaches_is_subset_of_first_argument(a in set_expr(), b in set_expr()) {
        let (a, b) = (render(&a), render(&b));
        let reached = eval(&format!("Reaches({a}, {b})"));
        prop_assert!(reached.is_subset(&eval(&a)));
    }

    #[test]
    fn prop_reaches_matches_depth_first_walk(a in set_expr(), b in set_expr()) {
        let (a, b) = (render(&a), render(&b));
        let seeds = eval(&format!("{a}:+test"));
        let targets = eval(&b);
        let expected: PackageSet = seeds
            .iter()
            .filter(|seed| {
                reachable_from(universe(), *seed)
                    .iter()
                    .any(|id| targets.contains(id))
            })
            .collect();
        prop_assert_eq!(eval(&format!("Reaches({a}:+test, {b})")), expected);
    }

    #[test]
    fn prop_variant_filters_partition(a in set_expr()) {
        let s = format!("{}:all:+test", render(&a));
        let variants = eval(&format!("variant=1({s})"));
        let plain = eval(&format!("variant=0({s})"));
        prop_assert!(variants.intersection(&plain).is_empty());
        let mut both = variants.clone();
        both.union_with(plain);
        prop_assert_eq!(both, eval(&s));
        prop_assert!(variants.iter().all(|id| universe().is_variant(id)));
    }

    #[test]
    fn prop_test_selectors_toggle_variants(a in set_expr()) {
        let a = render(&a);
        let base = eval(&a);
        prop_assert_eq!(eval(&format!("{a}:+test:-test")), base.clone());
        let plus_test = format!("{a}:+test");
        let test_only = format!("{a}:test");
        prop_assert!(base.is_subset(&eval(&plus_test)));
        prop_assert!(eval(&test_only).is_subset(&eval(&plus_test)));
    }

    #[test]
    fn prop_shared_is_intersection(a in set_expr(), b in set_expr()) {
        let (a, b) = (render(&a), render(&b));
        prop_assert_eq!(
            eval(&format!("Shared({a}:all, {b}:all)")),
            eval(&format!("{a}:all")).intersection(&eval(&format!("{b}:all")))
        );
    }
}

// ============================================================================
// Boundary cases
// ============================================================================

#[test]
fn test_empty_input_is_empty_set() {
    assert!(eval("").is_empty());
    assert!(eval("   ").is_empty());
}

#[test]
fn test_wildcard_matching_nothing_is_empty_set() {
    assert!(eval("nowhere.invalid/...").is_empty());
    assert!(eval("acme.org/g9/...").is_empty());
}

#[test]
fn test_everything_wildcard_skips_variants() {
    let everything = eval("...");
    assert!(everything.iter().all(|id| !universe().is_variant(id)));
    assert_eq!(everything, eval("acme.org/... example.com/kit/... lab.net/..."));
}

#[test]
fn test_unresolved_exact_path_is_an_error() {
    let err = query::evaluate(
        "acme.org/does/not/exist",
        catalog(),
        universe(),
        EvalOptions::strict(),
    )
    .unwrap_err();
    assert_eq!(
        err,
        QueryError::Eval(EvalError::UnresolvedPackage {
            path: "acme.org/does/not/exist".to_string()
        })
    );

    let lenient = query::evaluate(
        "acme.org/does/not/exist",
        catalog(),
        universe(),
        EvalOptions::lenient(),
    )
    .unwrap();
    assert!(lenient.is_empty());
}

#[test]
fn test_unknown_function_is_an_error() {
    let err = query::evaluate("Reach(acme.org/...)", catalog(), universe(), EvalOptions::strict())
        .unwrap_err();
    match err {
        QueryError::Eval(EvalError::UnknownFunction { name, suggestion, .. }) => {
            assert_eq!(name, "Reach");
            assert_eq!(suggestion.as_deref(), Some("Reaches"));
        }
        other => panic!("expected UnknownFunction, got {other:?}"),
    }
}

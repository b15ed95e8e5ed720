//! Evaluator that resolves a parsed expression to a package set.
//!
//! Evaluation is a pure function of the expression, the catalog and the
//! universe: nothing is mutated and the same inputs always yield the same
//! set. Any error aborts the whole expression.

use super::error::EvalError;
use crate::query::catalog::Catalog;
use crate::query::parser::ast::{Expr, PackagePattern, PatternKind};
use crate::query::parser::token::SetOp;
use crate::set::PackageSet;
use crate::universe::Universe;
use serde::{Deserialize, Serialize};

/// Knobs for one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Treat an exact package path missing from the universe as an empty
    /// set instead of failing with `UnresolvedPackage`.
    pub lenient_packages: bool,
}

impl EvalOptions {
    /// Strict evaluation: unresolved exact paths are errors.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            lenient_packages: false,
        }
    }

    /// Lenient evaluation: unresolved exact paths resolve to nothing.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            lenient_packages: true,
        }
    }
}

/// Walks an expression bottom-up against one universe.
///
/// The evaluator borrows both the catalog and the universe, so any number of
/// evaluators may run concurrently over a shared snapshot.
pub struct Evaluator<'c, 'u> {
    catalog: &'c Catalog,
    universe: &'u dyn Universe,
    options: EvalOptions,
}

impl<'c, 'u> Evaluator<'c, 'u> {
    /// Strict evaluator over `universe` using `catalog`.
    #[must_use]
    pub fn new(catalog: &'c Catalog, universe: &'u dyn Universe) -> Self {
        Self {
            catalog,
            universe,
            options: EvalOptions::default(),
        }
    }

    /// Replace the evaluation options.
    #[must_use]
    pub fn with_options(mut self, options: EvalOptions) -> Self {
        self.options = options;
        self
    }

    /// Evaluate an optional parse root; an empty expression yields the
    /// empty set.
    ///
    /// # Errors
    /// See [`evaluate`](Self::evaluate).
    pub fn evaluate_root(&self, root: Option<&Expr<'_>>) -> Result<PackageSet, EvalError> {
        root.map_or_else(|| Ok(PackageSet::new()), |expr| self.evaluate(expr))
    }

    /// Evaluate `expr` to a package set.
    ///
    /// # Errors
    /// Returns `EvalError` for unresolved exact paths (in strict mode),
    /// unknown selectors or functions, wrong argument counts and invalid
    /// function parameters.
    pub fn evaluate(&self, expr: &Expr<'_>) -> Result<PackageSet, EvalError> {
        match expr {
            Expr::Package(pattern) => self.resolve(pattern),

            Expr::Selector { .. } => {
                let (base, names) = expr.selector_chain();
                let transforms = names
                    .iter()
                    .map(|name| self.catalog.selector(name))
                    .collect::<Result<Vec<_>, _>>()?;

                let mut set = self.evaluate(base)?;
                for (name, transform) in names.iter().zip(transforms) {
                    let before = set.len();
                    set = transform(self.universe, &set);
                    tracing::debug!(
                        target: "pkgsel::eval",
                        selector = *name,
                        before,
                        after = set.len(),
                        "applied selector"
                    );
                }
                Ok(set)
            }

            Expr::Binary { op, left, right } => {
                let mut left = self.evaluate(left)?;
                let right = self.evaluate(right)?;
                match op {
                    SetOp::Union => {
                        left.union_with(right);
                        Ok(left)
                    }
                    SetOp::Difference => Ok(left.difference(&right)),
                }
            }

            Expr::ImplicitUnion(members) => {
                let mut set = PackageSet::new();
                for member in members {
                    set.union_with(self.evaluate(member)?);
                }
                Ok(set)
            }

            Expr::Call { name, args } => {
                let function = self.catalog.function(name, args.len())?;
                let values = args
                    .iter()
                    .map(|arg| self.evaluate(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let set = function.call(self.universe, values)?;
                tracing::debug!(
                    target: "pkgsel::eval",
                    function = %name,
                    result = set.len(),
                    "called function"
                );
                Ok(set)
            }
        }
    }

    fn resolve(&self, pattern: &PackagePattern<'_>) -> Result<PackageSet, EvalError> {
        match pattern.kind() {
            PatternKind::Everything => Ok(self.universe.match_all().into_iter().collect()),
            PatternKind::Subtree(prefix) => {
                let matched: PackageSet =
                    self.universe.match_subtree(prefix).into_iter().collect();
                if matched.is_empty() {
                    tracing::debug!(
                        target: "pkgsel::eval",
                        pattern = %pattern.path,
                        "wildcard matched nothing"
                    );
                }
                Ok(matched)
            }
            PatternKind::Exact(path) => match self.universe.lookup(path) {
                Some(id) => Ok(PackageSet::singleton(id)),
                None if self.options.lenient_packages => {
                    tracing::warn!(
                        target: "pkgsel::eval",
                        path,
                        "unresolved package treated as empty"
                    );
                    Ok(PackageSet::new())
                }
                None => Err(EvalError::UnresolvedPackage {
                    path: path.to_string(),
                }),
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::query::parser::{parse_tokens, tokenize};
    use crate::universe::{Snapshot, SnapshotBuilder};

    fn fixture() -> Snapshot {
        SnapshotBuilder::new()
            .package("acme.org/alpha", &["acme.org/beta"])
            .package("acme.org/beta", &["acme.org/gamma"])
            .package("acme.org/gamma", &[])
            .package("acme.org/tools/lint", &["acme.org/gamma"])
            .variant(
                "acme.org/beta [test]",
                "acme.org/beta",
                &["acme.org/gamma", "acme.org/tools/lint"],
            )
            .build()
            .unwrap()
    }

    fn eval_with(
        snapshot: &Snapshot,
        options: EvalOptions,
        source: &str,
    ) -> Result<Vec<String>, EvalError> {
        let catalog = Catalog::standard();
        let tokens = tokenize(source).unwrap();
        let root = parse_tokens(&tokens).unwrap();
        let set = Evaluator::new(&catalog, snapshot)
            .with_options(options)
            .evaluate_root(root.as_ref())?;
        Ok(set
            .sorted(snapshot)
            .into_iter()
            .map(|id| snapshot.package(id).unwrap().id.clone())
            .collect())
    }

    fn eval(source: &str) -> Result<Vec<String>, EvalError> {
        eval_with(&fixture(), EvalOptions::strict(), source)
    }

    #[test]
    fn test_empty_expression_is_empty_set() {
        assert_eq!(eval("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_patterns() {
        assert_eq!(eval("acme.org/alpha").unwrap(), vec!["acme.org/alpha"]);
        assert_eq!(
            eval("acme.org/...").unwrap(),
            vec!["acme.org/alpha", "acme.org/beta", "acme.org/gamma", "acme.org/tools/lint"]
        );
        assert_eq!(eval("...").unwrap().len(), 4);
        assert!(eval("nothing.org/...").unwrap().is_empty());
    }

    #[test]
    fn test_unresolved_exact_path() {
        assert_eq!(
            eval("acme.org/alpha acme.org/missing").unwrap_err(),
            EvalError::UnresolvedPackage {
                path: "acme.org/missing".to_string()
            }
        );
        let lenient = eval_with(
            &fixture(),
            EvalOptions::lenient(),
            "acme.org/alpha acme.org/missing",
        );
        assert_eq!(lenient.unwrap(), vec!["acme.org/alpha"]);
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            eval("acme.org/alpha:all - acme.org/beta").unwrap(),
            vec!["acme.org/alpha", "acme.org/gamma"]
        );
        assert_eq!(
            eval("acme.org/alpha + acme.org/gamma").unwrap(),
            eval("acme.org/gamma acme.org/alpha").unwrap()
        );
    }

    #[test]
    fn test_selectors_apply_in_source_order() {
        assert_eq!(
            eval("acme.org/beta:+test:-test").unwrap(),
            vec!["acme.org/beta"]
        );
        assert_eq!(
            eval("acme.org/beta:-test:+test").unwrap(),
            vec!["acme.org/beta", "acme.org/beta [test]"]
        );
        assert_eq!(
            eval("acme.org/beta:test:import").unwrap(),
            vec!["acme.org/gamma", "acme.org/tools/lint"]
        );
    }

    #[test]
    fn test_functions() {
        assert_eq!(
            eval("Reaches(acme.org/..., acme.org/gamma)").unwrap(),
            vec!["acme.org/alpha", "acme.org/beta", "acme.org/gamma", "acme.org/tools/lint"]
        );
        assert_eq!(
            eval("Reaches(acme.org/..., acme.org/beta)").unwrap(),
            vec!["acme.org/alpha", "acme.org/beta"]
        );
        assert_eq!(
            eval("variant=1(acme.org/...:+test)").unwrap(),
            vec!["acme.org/beta [test]"]
        );
        assert_eq!(
            eval("Incoming(acme.org/..., acme.org/gamma)").unwrap(),
            vec!["acme.org/beta", "acme.org/tools/lint"]
        );
    }

    #[test]
    fn test_unknown_names() {
        assert!(matches!(
            eval("Closure(acme.org/alpha)").unwrap_err(),
            EvalError::UnknownFunction { name, .. } if name == "Closure"
        ));
        assert!(matches!(
            eval("acme.org/alpha:deps").unwrap_err(),
            EvalError::UnknownSelector { name, .. } if name == "deps"
        ));
        assert!(matches!(
            eval("Reaches(acme.org/alpha)").unwrap_err(),
            EvalError::WrongArity { actual: 1, .. }
        ));
    }

    #[test]
    fn test_function_checked_before_arguments() {
        // The unknown function is reported, not the unresolved argument
        assert!(matches!(
            eval("Nope(acme.org/missing)").unwrap_err(),
            EvalError::UnknownFunction { .. }
        ));
    }
}

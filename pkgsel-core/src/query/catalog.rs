//! Selector and function catalog.
//!
//! The parser treats selector and function names as opaque text; this
//! registry gives them meaning at evaluation time. [`Catalog::standard`]
//! holds the built-in names and callers may register more, or start from an
//! empty catalog in tests to substitute fixture behaviours.
//!
//! Function names may carry a parameter after `=`: `variant=1` resolves to
//! the parameterized function `variant` with parameter `"1"`.

use super::executor::error::{Arity, EvalError};
use super::executor::reach::{closure, ReachabilityIndex};
use super::parser::typo_detection::find_closest_name;
use crate::set::PackageSet;
use crate::universe::Universe;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Transform applied by a selector: `(universe, input set) -> output set`.
pub type SelectorFn = dyn Fn(&dyn Universe, &PackageSet) -> PackageSet + Send + Sync;

/// Body of a function, run after its arguments are evaluated.
pub type FunctionFn = dyn Fn(FunctionCall<'_>) -> Result<PackageSet, EvalError> + Send + Sync;

/// Everything a function body receives.
pub struct FunctionCall<'a> {
    /// Function name as written, including any parameter
    pub name: &'a str,
    /// Text after `=` for parameterized functions
    pub param: Option<&'a str>,
    /// Universe the expression is evaluated against
    pub universe: &'a dyn Universe,
    /// Evaluated arguments in source order; count already checked
    pub args: Vec<PackageSet>,
}

struct Function {
    arity: Arity,
    parameterized: bool,
    example: String,
    body: Box<FunctionFn>,
}

/// Function looked up by name, ready to be called.
pub struct ResolvedFunction<'c, 'n> {
    function: &'c Function,
    name: &'n str,
    param: Option<&'n str>,
}

impl ResolvedFunction<'_, '_> {
    /// Run the function body on evaluated arguments.
    ///
    /// # Errors
    /// Propagates errors raised by the body, such as an invalid parameter.
    pub fn call(
        &self,
        universe: &dyn Universe,
        args: Vec<PackageSet>,
    ) -> Result<PackageSet, EvalError> {
        (self.function.body)(FunctionCall {
            name: self.name,
            param: self.param,
            universe,
            args,
        })
    }

    /// Parameter parsed from the name, if any.
    #[must_use]
    pub const fn param(&self) -> Option<&str> {
        self.param
    }
}

/// Name to behaviour registry for selectors and functions.
#[derive(Default)]
pub struct Catalog {
    selectors: BTreeMap<String, Arc<SelectorFn>>,
    functions: BTreeMap<String, Function>,
}

impl Catalog {
    /// Catalog with no entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the built-in selectors and functions.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();

        catalog.register_selector("all", closure);
        catalog.register_selector("import", direct_imports);
        catalog.alias_selector("imp", "import");
        catalog.register_selector("test", |universe, set| {
            set.iter()
                .flat_map(|id| {
                    let own = universe.is_variant(id).then_some(id);
                    own.into_iter()
                        .chain(universe.variants_of(id).iter().copied())
                })
                .collect()
        });
        catalog.register_selector("+test", |universe, set| {
            let mut out = set.clone();
            for id in set.iter() {
                out.extend(universe.variants_of(id).iter().copied());
            }
            out
        });
        catalog.register_selector("-test", |universe, set| {
            set.iter().filter(|id| !universe.is_variant(*id)).collect()
        });
        catalog.register_selector("source", sources);

        catalog.register_function(
            "Reaches",
            Arity::Exact(2),
            "Reaches(acme.org/..., acme.org/beta)",
            |call| {
                let mut args = call.args.into_iter();
                let seeds = args.next().unwrap_or_default();
                let targets = args.next().unwrap_or_default();
                let mut index = ReachabilityIndex::new(call.universe, &targets);
                let reached = index.filter(&seeds);
                tracing::trace!(
                    target: "pkgsel::eval",
                    seeds = seeds.len(),
                    answered = index.answered(),
                    "reachability index filled"
                );
                Ok(reached)
            },
        );
        catalog.register_parameterized_function(
            "variant",
            Arity::Exact(1),
            "variant=1(acme.org/...)",
            |call| {
                let wants_variants = match call.param {
                    Some("0") => false,
                    Some("1") => true,
                    other => {
                        return Err(EvalError::InvalidParameter {
                            function: call.name.to_string(),
                            reason: format!(
                                "expected 0 or 1, got '{}'",
                                other.unwrap_or_default()
                            ),
                            example: "variant=1(acme.org/...)".to_string(),
                        });
                    }
                };
                let universe = call.universe;
                Ok(call
                    .args
                    .into_iter()
                    .next()
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|id| universe.is_variant(*id) == wants_variants)
                    .collect())
            },
        );
        catalog.register_function(
            "Shared",
            Arity::AtLeast(2),
            "Shared(acme.org/alpha:all, acme.org/beta:all)",
            |call| {
                let mut args = call.args.into_iter();
                let first = args.next().unwrap_or_default();
                Ok(args.fold(first, |acc, next| acc.intersection(&next)))
            },
        );
        catalog.register_function(
            "Incoming",
            Arity::Exact(2),
            "Incoming(acme.org/..., acme.org/beta)",
            |call| {
                let mut args = call.args.into_iter();
                let importers = args.next().unwrap_or_default();
                let targets = args.next().unwrap_or_default();
                let universe = call.universe;
                Ok(importers
                    .into_iter()
                    .filter(|id| {
                        universe
                            .imports(*id)
                            .iter()
                            .any(|import| targets.contains(*import))
                    })
                    .collect())
            },
        );

        catalog
    }

    /// Register or replace a selector.
    pub fn register_selector<F>(&mut self, name: &str, transform: F) -> &mut Self
    where
        F: Fn(&dyn Universe, &PackageSet) -> PackageSet + Send + Sync + 'static,
    {
        self.selectors.insert(name.to_string(), Arc::new(transform));
        self
    }

    /// Make `alias` resolve to the selector registered as `target`.
    ///
    /// Returns false when `target` is not registered.
    pub fn alias_selector(&mut self, alias: &str, target: &str) -> bool {
        match self.selectors.get(target).cloned() {
            Some(transform) => {
                self.selectors.insert(alias.to_string(), transform);
                true
            }
            None => false,
        }
    }

    /// Register or replace a function taking no parameter.
    pub fn register_function<F>(
        &mut self,
        name: &str,
        arity: Arity,
        example: &str,
        body: F,
    ) -> &mut Self
    where
        F: Fn(FunctionCall<'_>) -> Result<PackageSet, EvalError> + Send + Sync + 'static,
    {
        self.insert_function(name, arity, false, example, Box::new(body))
    }

    /// Register or replace a function written as `name=param(...)`.
    pub fn register_parameterized_function<F>(
        &mut self,
        name: &str,
        arity: Arity,
        example: &str,
        body: F,
    ) -> &mut Self
    where
        F: Fn(FunctionCall<'_>) -> Result<PackageSet, EvalError> + Send + Sync + 'static,
    {
        self.insert_function(name, arity, true, example, Box::new(body))
    }

    fn insert_function(
        &mut self,
        name: &str,
        arity: Arity,
        parameterized: bool,
        example: &str,
        body: Box<FunctionFn>,
    ) -> &mut Self {
        self.functions.insert(
            name.to_string(),
            Function {
                arity,
                parameterized,
                example: example.to_string(),
                body,
            },
        );
        self
    }

    /// Look up a selector.
    ///
    /// # Errors
    /// Returns `EvalError::UnknownSelector`, with the closest registered name
    /// when one is near.
    pub fn selector(&self, name: &str) -> Result<&SelectorFn, EvalError> {
        self.selectors
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| EvalError::UnknownSelector {
                name: name.to_string(),
                suggestion: find_closest_name(name, self.selector_names()),
                available: self.selector_names().collect::<Vec<_>>().join(", "),
            })
    }

    /// Look up a function by its written name and check the argument count.
    ///
    /// # Errors
    /// Returns `UnknownFunction`, `InvalidParameter` when a parameter is
    /// missing or unexpected, or `WrongArity`.
    pub fn function<'n>(
        &self,
        name: &'n str,
        arg_count: usize,
    ) -> Result<ResolvedFunction<'_, 'n>, EvalError> {
        let (base, param) = match self.functions.get(name) {
            Some(_) => (name, None),
            None => match name.split_once('=') {
                Some((base, param)) => (base, Some(param)),
                None => (name, None),
            },
        };

        let function = self
            .functions
            .get(base)
            .ok_or_else(|| EvalError::UnknownFunction {
                name: name.to_string(),
                suggestion: find_closest_name(base, self.function_names()),
                available: self.function_names().collect::<Vec<_>>().join(", "),
            })?;

        match (function.parameterized, param) {
            (true, None) => {
                return Err(EvalError::InvalidParameter {
                    function: name.to_string(),
                    reason: format!("'{base}' needs a parameter written as '{base}=value'"),
                    example: function.example.clone(),
                });
            }
            (false, Some(param)) => {
                return Err(EvalError::InvalidParameter {
                    function: name.to_string(),
                    reason: format!("'{base}' takes no parameter, got '{param}'"),
                    example: function.example.clone(),
                });
            }
            _ => {}
        }

        if !function.arity.accepts(arg_count) {
            return Err(EvalError::WrongArity {
                function: name.to_string(),
                expected: function.arity,
                actual: arg_count,
                example: function.example.clone(),
            });
        }

        Ok(ResolvedFunction {
            function,
            name,
            param,
        })
    }

    /// Registered selector names in sorted order.
    pub fn selector_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.selectors.keys().map(String::as_str)
    }

    /// Registered function base names in sorted order.
    pub fn function_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.functions.keys().map(String::as_str)
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("selectors", &self.selectors.keys().collect::<Vec<_>>())
            .field("functions", &self.functions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Packages directly imported by members of `set`.
fn direct_imports(universe: &dyn Universe, set: &PackageSet) -> PackageSet {
    set.iter()
        .flat_map(|id| universe.imports(id).iter().copied())
        .collect()
}

/// Members of `set` that no other member imports.
fn sources(universe: &dyn Universe, set: &PackageSet) -> PackageSet {
    let mut imported = PackageSet::new();
    for id in set.iter() {
        imported.extend(
            universe
                .imports(id)
                .iter()
                .copied()
                .filter(|import| *import != id && set.contains(*import)),
        );
    }
    set.difference(&imported)
}

//! Package-set query language.
//!
//! ```text
//! text -> tokenize -> parse -> Expr -> Evaluator(Expr, Universe) -> PackageSet
//! ```
//!
//! Parsing never consults the universe or the catalog: selector and function
//! names are opaque until evaluation, and wildcards are expanded only then.
//!
//! ## Example
//!
//! ```rust
//! use pkgsel_core::query::{self, Catalog, EvalOptions};
//! use pkgsel_core::universe::SnapshotBuilder;
//!
//! let universe = SnapshotBuilder::new()
//!     .package("acme.org/alpha", &["acme.org/beta"])
//!     .package("acme.org/beta", &[])
//!     .build()
//!     .unwrap();
//! let catalog = Catalog::standard();
//!
//! let set = query::evaluate("acme.org/alpha:all", &catalog, &universe, EvalOptions::default())
//!     .unwrap();
//! assert_eq!(set.len(), 2);
//! ```

pub mod catalog;
pub mod executor;
pub mod parser;

pub use catalog::{Catalog, FunctionCall, ResolvedFunction, SelectorFn};
pub use executor::{EvalError, EvalOptions, Evaluator};
pub use parser::{Expr, ParseError, TokenizeError};

use crate::error::QueryError;
use crate::set::PackageSet;
use crate::universe::Universe;

/// Tokenize and parse an expression.
///
/// Returns `Ok(None)` for blank input.
///
/// # Errors
/// Returns `QueryError::Tokenize` or `QueryError::Parse`.
pub fn parse(source: &str) -> Result<Option<Expr<'_>>, QueryError> {
    let tokens = parser::tokenize(source)?;
    Ok(parser::parse_tokens(&tokens)?)
}

/// Parse and evaluate an expression in one step.
///
/// # Errors
/// Returns the first tokenize, parse or evaluation error.
pub fn evaluate(
    source: &str,
    catalog: &Catalog,
    universe: &dyn Universe,
    options: EvalOptions,
) -> Result<PackageSet, QueryError> {
    let root = parse(source)?;
    let set = Evaluator::new(catalog, universe)
        .with_options(options)
        .evaluate_root(root.as_ref())?;
    tracing::debug!(target: "pkgsel::eval", source, result = set.len(), "evaluated expression");
    Ok(set)
}

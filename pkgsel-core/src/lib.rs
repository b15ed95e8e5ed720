//! Package-set query engine.
//!
//! Select a subset of a pre-computed package graph with a short expression
//! combining package-path patterns, set operators, chained selectors and
//! named functions:
//!
//! ```text
//! acme.org/...:all - Reaches(acme.org/..., acme.org/legacy):+test
//! ```
//!
//! - [`query`]: tokenizer, parser, AST, catalog and evaluator
//! - [`universe`]: the package graph and its snapshot loader
//! - [`set`]: the package sets expressions evaluate to
//! - [`graph`]: deterministic subgraphs for formatters

// Safety-focused Clippy lints to prevent unsafe error handling regression
#![warn(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo
)]
#![deny(clippy::unwrap_in_result, clippy::panic_in_result_fn)]

pub mod error;
pub mod graph;
pub mod query;
pub mod set;
pub mod universe;

pub use error::QueryError;
pub use graph::{Node, Subgraph};
pub use query::{Catalog, EvalError, EvalOptions, Evaluator, Expr, ParseError, TokenizeError};
pub use set::PackageSet;
pub use universe::{
    load_snapshot, ModuleInfo, Package, PackageId, ReferenceSet, Snapshot, SnapshotBuilder,
    SnapshotError, Universe,
};

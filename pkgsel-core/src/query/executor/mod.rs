//! Expression evaluation against a package universe.
//!
//! - `evaluator`: the AST walker and its options
//! - `reach`: memoized reachability and transitive closure
//! - `error`: evaluation failures

pub mod error;
pub mod evaluator;
pub mod reach;

pub use error::{Arity, EvalError};
pub use evaluator::{EvalOptions, Evaluator};
pub use reach::{closure, ReachabilityIndex};

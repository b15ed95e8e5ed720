//! Zero-copy parser infrastructure for package-set expressions.
//!
//! ## Architecture
//!
//! 1. **Tokenization** (`Tokenizer`): converts expression text into a token
//!    stream whose text borrows from the source.
//! 2. **Parsing** (`Parser`): recursive descent over the token slice,
//!    producing at most one `Expr` root.
//! 3. **Position Tracking** (`Position`, `Spanned`): byte offsets for slicing
//!    plus line/column numbers for messages.
//! 4. **Errors** (`TokenizeError`, `ParseError`): position, offending text,
//!    a suggestion and an example of valid syntax.
//!
//! ## Example
//!
//! ```rust
//! use pkgsel_core::query::parser::{tokenize, parse_tokens};
//!
//! let source = "baseline - (baseline - coreutil:all)";
//! let tokens = tokenize(source).unwrap();
//! let expr = parse_tokens(&tokens).unwrap().unwrap();
//! assert_eq!(expr.to_string(), "-(baseline, -(baseline, coreutil:all))");
//! ```

pub mod ast;
pub mod error;
#[allow(clippy::module_inception)] // parser module contains Parser type
pub mod parser;
pub mod token;
pub mod tokenizer;
pub mod typo_detection;

// Re-export public API
pub use ast::{path_in_subtree, Expr, PackagePattern, PatternKind, WILDCARD_ALL, WILDCARD_SUFFIX};
pub use error::{ErrorKind, ParseError, TokenizeError};
pub use parser::{parse_tokens, ParseResult, Parser, MAX_NESTING};
pub use token::{Position, SetOp, Spanned, Token};
pub use tokenizer::{tokenize, Tokenizer};

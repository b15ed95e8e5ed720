//! Top-level error joining the three phases of running an expression.

use crate::query::executor::EvalError;
use crate::query::parser::{ParseError, Position, TokenizeError};
use thiserror::Error;

/// Any failure between expression text and a package set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Malformed token, e.g. an empty selector name.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),

    /// Grammar violation.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Evaluation against the universe failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl QueryError {
    /// Source position for tokenize and parse errors.
    #[must_use]
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Tokenize(err) => Some(err.position()),
            Self::Parse(err) => Some(err.position),
            Self::Eval(_) => None,
        }
    }

    /// Message for a terminal: positional errors get the source line and a
    /// caret under the offending column.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        match self {
            Self::Tokenize(err) => err.render(source),
            Self::Parse(err) => err.render(source),
            Self::Eval(err) => err.to_string(),
        }
    }
}

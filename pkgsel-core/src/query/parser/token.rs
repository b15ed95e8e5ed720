//! Token types with zero-copy lifetime-based design.
//!
//! Tokens borrow their text from the expression source, so a token stream
//! costs no allocation beyond the `Vec` that holds it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Explicit set operator between two terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SetOp {
    /// `+` - union of both operands
    Union,
    /// `-` - left operand minus right operand
    Difference,
}

impl SetOp {
    /// Literal spelling used in source text and canonical output.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Union => '+',
            Self::Difference => '-',
        }
    }
}

/// Token produced by the expression tokenizer.
///
/// Text-carrying variants borrow from the source; the `'a` lifetime ties
/// every token to the expression it was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// Package path or wildcard pattern, e.g. `acme.org/alpha/...`
    Package(&'a str),
    /// Explicit `+` or `-` between terms
    Op(SetOp),
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Selector name without the leading `:` (may start with `+` or `-`)
    Selector(&'a str),
    /// Function name immediately followed by `(`, e.g. `Reaches`, `variant=1`
    Func(&'a str),
    /// Argument separator `,`
    Comma,
    /// End of input marker (never part of a collected token list)
    Eof,
}

impl Token<'_> {
    /// Raw source text of the token.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Package(text) | Self::Selector(text) | Self::Func(text) => text,
            Self::Op(SetOp::Union) => "+",
            Self::Op(SetOp::Difference) => "-",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Eof => "",
        }
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Selector(name) => write!(f, ":{name}"),
            other => f.write_str(other.text()),
        }
    }
}

/// Source position of a token or error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset in source (not char offset, so slicing stays O(1))
    pub offset: usize,
    /// Line number, 1-indexed
    pub line: usize,
    /// Column number, 1-indexed, counted in code points
    pub column: usize,
}

impl Position {
    /// Position at the start of the source.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Position at a specific location.
    #[must_use]
    pub const fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Value paired with the source span it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<T> {
    /// The wrapped value
    pub value: T,
    /// Starting position in source
    pub start: Position,
    /// Ending position in source (exclusive)
    pub end: Position,
}

impl<T> Spanned<T> {
    /// Create spanned value from components.
    #[must_use]
    pub const fn new(value: T, start: Position, end: Position) -> Self {
        Self { value, start, end }
    }

    /// Extract source snippet from original input.
    #[must_use]
    pub fn snippet<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.start.offset..self.end.offset)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_position_creation() {
        let pos = Position::start();
        assert_eq!(pos, Position::new(0, 1, 1));
        assert_eq!(pos.to_string(), "line 1, column 1");
    }

    #[test]
    fn test_spanned_snippet() {
        let source = "acme.org/alpha:all";
        let spanned = Spanned::new(
            Token::Package("acme.org/alpha"),
            Position::new(0, 1, 1),
            Position::new(14, 1, 15),
        );
        assert_eq!(spanned.snippet(source), Some("acme.org/alpha"));
    }

    #[test]
    fn test_token_text_round_trip() {
        assert_eq!(Token::Op(SetOp::Union).text(), "+");
        assert_eq!(Token::Op(SetOp::Difference).text(), "-");
        assert_eq!(Token::Selector("-test").to_string(), ":-test");
        assert_eq!(Token::Func("variant=1").text(), "variant=1");
    }
}

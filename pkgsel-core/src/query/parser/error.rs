//! Tokenization and parsing errors with actionable messages.
//!
//! Every error carries the source position and the offending text. Parse
//! errors additionally carry a suggestion and an example of valid syntax so
//! the command line can print something a user can act on directly.

use super::token::{Position, Token};
use std::fmt;
use thiserror::Error;

// ============================================================================
// Tokenization Errors
// ============================================================================

/// Errors raised while cutting expression text into tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A `:` was not followed by a selector name.
    #[error("Empty selector name after ':' at {position}")]
    EmptySelector {
        /// Position of the `:` character
        position: Position,
    },

    /// A run directly followed by `(` does not look like a function name.
    #[error("'{name}' at {position} is not a function name")]
    InvalidFunctionName {
        /// Text before the `(`
        name: String,
        /// Start of the run
        position: Position,
    },
}

impl TokenizeError {
    /// Position the error refers to.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::EmptySelector { position } | Self::InvalidFunctionName { position, .. } => {
                *position
            }
        }
    }

    /// Render the error with a caret under the offending column.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        let position = self.position();
        let (suggestion, example) = match self {
            Self::EmptySelector { .. } => {
                ("write a selector name after ':'", "acme.org/alpha:all")
            }
            Self::InvalidFunctionName { .. } => (
                "put a space before '(' to start a group, or call a function by name",
                "acme.org/alpha (acme.org/beta) or Reaches(acme.org/alpha, acme.org/beta)",
            ),
        };
        format!(
            "{self}\n{}\n{}^\nSuggestion: {suggestion}\nExample: {example}",
            extract_line(source, position.line),
            " ".repeat(position.column.saturating_sub(1))
        )
    }
}

/// Extract single line from source for error context.
fn extract_line(source: &str, line_num: usize) -> &str {
    source.lines().nth(line_num.saturating_sub(1)).unwrap_or("")
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Grammar violation with position, suggestion and example.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Type of parse error
    pub kind: ErrorKind,
    /// Position where the error occurred
    pub position: Position,
    /// Offending source text (empty at end of input)
    pub found: String,
    /// Actionable suggestion for fixing the error
    pub suggestion: String,
    /// Example of correct syntax
    pub example: String,
}

/// Which grammar rule was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `(` without matching `)`
    UnclosedParen,
    /// `)` without matching `(`
    UnmatchedCloseParen,
    /// Operator with nothing on its left
    MissingLeftOperand,
    /// Operator with nothing on its right
    MissingRightOperand,
    /// `,` where no argument list is open
    MisplacedComma,
    /// `:name` with no term before it
    DanglingSelector,
    /// Function call without its closing `)`
    UnclosedCall,
    /// Prefix operator form `+(a, b)` with other than two operands
    PrefixOperandCount,
    /// A term was required but the input ended or another token appeared
    ExpectedTerm,
    /// Groups, calls, operator or selector chains deeper than the parser
    /// allows
    TooDeep,
}

impl ErrorKind {
    /// Short description of the violation.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::UnclosedParen => "unmatched '(' is never closed",
            Self::UnmatchedCloseParen => "unmatched ')'",
            Self::MissingLeftOperand => "operator is missing its left operand",
            Self::MissingRightOperand => "operator is missing its right operand",
            Self::MisplacedComma => "',' outside a function argument list",
            Self::DanglingSelector => "selector has no package or expression before it",
            Self::UnclosedCall => "function call is missing its closing ')'",
            Self::PrefixOperandCount => "prefix operator form takes exactly two operands",
            Self::ExpectedTerm => "expected a package, function call or '('",
            Self::TooDeep => "expression is nested or chained too deeply",
        }
    }

    const fn suggestion_and_example(self) -> (&'static str, &'static str) {
        match self {
            Self::UnclosedParen => (
                "Add ')' to close the group",
                "baseline - (baseline - coreutil:all)",
            ),
            Self::UnmatchedCloseParen => (
                "Remove the extra ')' or add the matching '('",
                "(acme.org/alpha + acme.org/beta):all",
            ),
            Self::MissingLeftOperand => (
                "Put a package or group before the operator",
                "acme.org/alpha - acme.org/alpha/internal/...",
            ),
            Self::MissingRightOperand => (
                "Put a package or group after the operator",
                "acme.org/alpha + acme.org/beta",
            ),
            Self::MisplacedComma => (
                "Separate terms with spaces or '+'; commas only separate function arguments",
                "Reaches(acme.org/alpha, acme.org/gamma:all)",
            ),
            Self::DanglingSelector => (
                "Attach the selector directly to a package or group",
                "acme.org/alpha:all",
            ),
            Self::UnclosedCall => (
                "Close the argument list with ')'",
                "Reaches(acme.org/alpha, acme.org/beta)",
            ),
            Self::PrefixOperandCount => (
                "Give the operator exactly two comma separated operands",
                "-(acme.org/alpha:all, acme.org/beta)",
            ),
            Self::ExpectedTerm => (
                "Start the term with a package path, a function call or '('",
                "acme.org/alpha/... acme.org/beta",
            ),
            Self::TooDeep => (
                "Flatten the expression; juxtaposed terms form one union and need no '+' or parentheses",
                "acme.org/alpha acme.org/beta acme.org/gamma",
            ),
        }
    }
}

impl ParseError {
    /// Create an error of `kind` at the given token.
    #[must_use]
    pub fn at(kind: ErrorKind, token: &Token<'_>, position: Position) -> Self {
        let (suggestion, example) = kind.suggestion_and_example();
        Self {
            kind,
            position,
            found: token.to_string(),
            suggestion: suggestion.to_string(),
            example: example.to_string(),
        }
    }

    /// Add or override suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }

    /// Render the error with the source line and a caret under the column.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        format!(
            "{self}\n{}\n{}^",
            extract_line(source, self.position.line),
            " ".repeat(self.position.column.saturating_sub(1))
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error at {}: {}", self.position, self.kind.message())?;
        if self.found.is_empty() {
            write!(f, " (at end of expression)")?;
        } else {
            write!(f, " (found '{}')", self.found)?;
        }
        if !self.suggestion.is_empty() {
            write!(f, "\n  Suggestion: {}", self.suggestion)?;
        }
        if !self.example.is_empty() {
            write!(f, "\n  Example: {}", self.example)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

//! Hand-written recursive descent parser for package-set expressions.
//!
//! Each grammar production has a corresponding method:
//!
//! ```text
//! expr          ::= union_seq
//! union_seq     ::= add_sub ( add_sub )*
//! add_sub       ::= atom ( ('+' | '-') atom )*
//! atom          ::= PACKAGE selector_chain
//!                 | FUNC '(' expr (',' expr)* ')' selector_chain
//!                 | '(' expr (',' expr)* ')' selector_chain
//!                 | ('+' | '-') '(' expr ',' expr ')' selector_chain
//! selector_chain ::= SELECTOR*
//! ```
//!
//! A parenthesized list of two or more expressions is an implicit union and
//! an operator in term position followed by `(` is the prefix form of a
//! binary operation. Both are the shapes the canonical printer produces.
//!
//! Operator and selector chains are built in a loop but nest to the left,
//! so every production reports the height of the tree it built and the
//! parser rejects trees taller than [`MAX_NESTING`]. Evaluation, printing
//! and drop all recurse along that height, and the canonical form of an
//! accepted tree never nests more parentheses than the limit allows.

use super::ast::Expr;
use super::error::{ErrorKind, ParseError};
use super::token::{Position, SetOp, Spanned, Token};

/// Type alias for parser results.
pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest parenthesis nesting and tallest syntax tree the parser accepts.
///
/// Each operator, selector, group and call adds one level of height;
/// juxtaposed terms share a level.
pub const MAX_NESTING: usize = 128;

/// Expression with the height of its tree.
struct Parsed<'a> {
    expr: Expr<'a>,
    height: usize,
}

impl<'a> Parsed<'a> {
    const fn leaf(expr: Expr<'a>) -> Self {
        Self { expr, height: 1 }
    }
}

/// Recursive descent parser over a token slice with single-token lookahead.
///
/// Invariants:
/// - `cursor <= tokens.len()`; `cursor == tokens.len()` means end of input
/// - `end` is the position just past the last token
pub struct Parser<'t, 'a> {
    /// Token stream produced by the tokenizer (no `Eof` entry)
    tokens: &'t [Spanned<Token<'a>>],
    /// Index of the current token
    cursor: usize,
    /// Position reported for errors at end of input
    end: Position,
    /// Open parentheses around the cursor
    depth: usize,
}

impl<'t, 'a> Parser<'t, 'a> {
    /// Create a parser over an already tokenized expression.
    #[must_use]
    pub fn new(tokens: &'t [Spanned<Token<'a>>]) -> Self {
        let end = tokens.last().map_or(Position::start(), |token| token.end);
        Self {
            tokens,
            cursor: 0,
            end,
            depth: 0,
        }
    }

    /// Parse the whole token stream.
    ///
    /// Returns `Ok(None)` for an empty stream.
    ///
    /// # Errors
    /// Returns `ParseError` on any grammar violation.
    pub fn parse(mut self) -> ParseResult<Option<Expr<'a>>> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_expr()?.expr;

        let token = self.current();
        let kind = match token {
            Token::Eof => return Ok(Some(expr)),
            Token::RightParen => ErrorKind::UnmatchedCloseParen,
            Token::Comma => ErrorKind::MisplacedComma,
            Token::Selector(_) => ErrorKind::DanglingSelector,
            Token::Op(_) => ErrorKind::MissingRightOperand,
            Token::Package(_) | Token::Func(_) | Token::LeftParen => ErrorKind::ExpectedTerm,
        };
        Err(self.error(kind))
    }

    // ========================================================================
    // Productions
    // ========================================================================

    /// `union_seq`: two or more juxtaposed terms become an implicit union.
    fn parse_expr(&mut self) -> ParseResult<Parsed<'a>> {
        let (start, start_token) = (self.position(), self.current());
        let first = self.parse_add_sub()?;
        if !self.at_term_start() {
            return Ok(first);
        }

        let mut height = first.height;
        let mut members = vec![first.expr];
        while self.at_term_start() {
            let member = self.parse_add_sub()?;
            height = height.max(member.height);
            members.push(member.expr);
        }
        let height = self.check_height(height + 1, &start_token, start)?;
        Ok(Parsed {
            expr: Expr::ImplicitUnion(members),
            height,
        })
    }

    /// `add_sub`: left-associative chain of explicit operators.
    fn parse_add_sub(&mut self) -> ParseResult<Parsed<'a>> {
        let mut left = self.parse_atom()?;

        while let Token::Op(op) = self.current() {
            let operator = self.position();
            self.advance();
            match self.current() {
                Token::Eof | Token::RightParen | Token::Comma => {
                    return Err(self.error_at(ErrorKind::MissingRightOperand, &Token::Op(op), operator));
                }
                Token::Op(_) if !self.at_prefix_op() => {
                    return Err(self.error_at(ErrorKind::MissingRightOperand, &Token::Op(op), operator));
                }
                _ => {}
            }
            let right = self.parse_atom()?;
            let height = left.height.max(right.height) + 1;
            left = Parsed {
                height: self.check_height(height, &Token::Op(op), operator)?,
                expr: Expr::binary(op, left.expr, right.expr),
            };
        }

        Ok(left)
    }

    /// `atom` followed by its selector chain.
    fn parse_atom(&mut self) -> ParseResult<Parsed<'a>> {
        let atom = match self.current() {
            Token::Package(path) => {
                self.advance();
                Parsed::leaf(Expr::package(path))
            }
            Token::Func(name) => {
                let start = self.position();
                self.advance();
                let (args, height) = self.parse_parenthesized(ErrorKind::UnclosedCall)?;
                Parsed {
                    height: self.check_height(height + 1, &Token::Func(name), start)?,
                    expr: Expr::call(name, args),
                }
            }
            Token::LeftParen => {
                let start = self.position();
                let (mut members, height) = self.parse_parenthesized(ErrorKind::UnclosedParen)?;
                if members.len() == 1 {
                    Parsed {
                        expr: members.remove(0),
                        height,
                    }
                } else {
                    Parsed {
                        height: self.check_height(height + 1, &Token::LeftParen, start)?,
                        expr: Expr::ImplicitUnion(members),
                    }
                }
            }
            Token::Op(op) if self.at_prefix_op() => self.parse_prefix_op(op)?,
            Token::Op(_) => return Err(self.error(ErrorKind::MissingLeftOperand)),
            Token::Selector(_) => return Err(self.error(ErrorKind::DanglingSelector)),
            Token::Comma if self.depth == 0 => return Err(self.error(ErrorKind::MisplacedComma)),
            Token::RightParen if self.depth == 0 => {
                return Err(self.error(ErrorKind::UnmatchedCloseParen));
            }
            Token::Comma | Token::RightParen | Token::Eof => {
                return Err(self.error(ErrorKind::ExpectedTerm));
            }
        };

        self.parse_selector_chain(atom)
    }

    /// Prefix form `+(left, right)` / `-(left, right)`.
    fn parse_prefix_op(&mut self, op: SetOp) -> ParseResult<Parsed<'a>> {
        let operator = self.position();
        self.advance();
        let (mut operands, height) = self.parse_parenthesized(ErrorKind::UnclosedParen)?;
        if operands.len() != 2 {
            let err = self.error_at(ErrorKind::PrefixOperandCount, &Token::Op(op), operator);
            return Err(err.with_suggestion(format!(
                "Give '{}' exactly two operands instead of {}",
                op.symbol(),
                operands.len()
            )));
        }
        let right = operands.pop();
        let left = operands.pop();
        match (left, right) {
            (Some(left), Some(right)) => Ok(Parsed {
                height: self.check_height(height + 1, &Token::Op(op), operator)?,
                expr: Expr::binary(op, left, right),
            }),
            _ => Err(self.error_at(ErrorKind::PrefixOperandCount, &Token::Op(op), operator)),
        }
    }

    /// `'(' expr (',' expr)* ')'` starting at the current `(`, with the
    /// height of the tallest item.
    fn parse_parenthesized(
        &mut self,
        unclosed: ErrorKind,
    ) -> ParseResult<(Vec<Expr<'a>>, usize)> {
        if self.current() != Token::LeftParen {
            return Err(self.error(unclosed));
        }
        if self.depth >= MAX_NESTING {
            return Err(self.error(ErrorKind::TooDeep));
        }
        self.advance();
        self.depth += 1;

        let first = self.parse_expr()?;
        let mut height = first.height;
        let mut items = vec![first.expr];
        while self.current() == Token::Comma {
            self.advance();
            let item = self.parse_expr()?;
            height = height.max(item.height);
            items.push(item.expr);
        }

        if self.current() != Token::RightParen {
            return Err(self.error(unclosed));
        }
        self.advance();
        self.depth -= 1;
        Ok((items, height))
    }

    /// Wrap `base` in every selector that immediately follows it.
    fn parse_selector_chain(&mut self, base: Parsed<'a>) -> ParseResult<Parsed<'a>> {
        let mut parsed = base;
        while let Token::Selector(name) = self.current() {
            let height = self.check_height(parsed.height + 1, &Token::Selector(name), self.position())?;
            self.advance();
            parsed = Parsed {
                expr: Expr::selector(parsed.expr, name),
                height,
            };
        }
        Ok(parsed)
    }

    // ========================================================================
    // Parser State Management
    // ========================================================================

    /// Current token, `Token::Eof` past the end.
    #[inline]
    fn current(&self) -> Token<'a> {
        self.tokens
            .get(self.cursor)
            .map_or(Token::Eof, |token| token.value)
    }

    /// Token after the current one, `Token::Eof` past the end.
    #[inline]
    fn lookahead(&self) -> Token<'a> {
        self.tokens
            .get(self.cursor + 1)
            .map_or(Token::Eof, |token| token.value)
    }

    #[inline]
    fn advance(&mut self) {
        if self.cursor < self.tokens.len() {
            self.cursor += 1;
        }
    }

    /// Operator immediately followed by `(` in term position.
    #[inline]
    fn at_prefix_op(&self) -> bool {
        matches!(self.current(), Token::Op(_)) && self.lookahead() == Token::LeftParen
    }

    /// Can the current token begin another juxtaposed term?
    #[inline]
    fn at_term_start(&self) -> bool {
        matches!(
            self.current(),
            Token::Package(_) | Token::Func(_) | Token::LeftParen
        )
    }

    /// Position of the current token, or end of input.
    #[inline]
    fn position(&self) -> Position {
        self.tokens
            .get(self.cursor)
            .map_or(self.end, |token| token.start)
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::at(kind, &self.current(), self.position())
    }

    /// Reject trees taller than [`MAX_NESTING`], blaming the token that would
    /// add the extra level.
    fn check_height(
        &self,
        height: usize,
        token: &Token<'_>,
        position: Position,
    ) -> ParseResult<usize> {
        if height > MAX_NESTING {
            return Err(self.error_at(ErrorKind::TooDeep, token, position));
        }
        Ok(height)
    }

    #[allow(clippy::unused_self)]
    fn error_at(&self, kind: ErrorKind, token: &Token<'_>, position: Position) -> ParseError {
        ParseError::at(kind, token, position)
    }
}

/// Parse an already tokenized expression.
///
/// # Errors
/// Returns `ParseError` on any grammar violation.
pub fn parse_tokens<'a>(tokens: &[Spanned<Token<'a>>]) -> ParseResult<Option<Expr<'a>>> {
    Parser::new(tokens).parse()
}

// ============================================================================
// Unit Tests
// ============================================================================

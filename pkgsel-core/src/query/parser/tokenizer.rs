//! Zero-copy tokenizer for package-set expressions.
//!
//! The tokenizer walks the source once, tracking byte offset, line and column
//! for every token. Token text is sliced straight out of the source.

use super::error::TokenizeError;
use super::token::{Position, SetOp, Spanned, Token};

/// Streaming tokenizer over an expression.
///
/// Invariants:
/// - `position.offset` is always a valid byte index into `source`
/// - `chars` stays synchronized with `position`
#[derive(Clone)]
pub struct Tokenizer<'a> {
    /// Source expression - all tokens borrow from this
    source: &'a str,

    /// UTF-8 aware character iterator with byte indices
    chars: std::str::CharIndices<'a>,

    /// Current character under cursor, None at end of input
    current: Option<(usize, char)>,

    /// Current position for error reporting and token spanning
    position: Position,
}

impl<'a> Tokenizer<'a> {
    /// Create new tokenizer from source string.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.char_indices();
        let current = chars.next();

        Self {
            source,
            chars,
            current,
            position: Position::start(),
        }
    }

    /// Consume and return next token. Returns `Token::Eof` once exhausted.
    ///
    /// # Errors
    /// Returns `TokenizeError::EmptySelector` when `:` is not followed by a
    /// selector name, and `TokenizeError::InvalidFunctionName` when a run
    /// that is not a function name touches a `(`.
    pub fn next_token(&mut self) -> Result<Spanned<Token<'a>>, TokenizeError> {
        while let Some((_, ch)) = self.current {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }

        let start = self.position;

        let token = match self.current {
            None => Token::Eof,
            Some((_, '(')) => {
                self.advance();
                Token::LeftParen
            }
            Some((_, ')')) => {
                self.advance();
                Token::RightParen
            }
            Some((_, ',')) => {
                self.advance();
                Token::Comma
            }
            Some((_, '+')) => {
                self.advance();
                Token::Op(SetOp::Union)
            }
            Some((_, '-')) => {
                self.advance();
                Token::Op(SetOp::Difference)
            }
            Some((_, ':')) => {
                self.advance();
                let name = self.read_run();
                if name.is_empty() {
                    return Err(TokenizeError::EmptySelector { position: start });
                }
                Token::Selector(name)
            }
            Some(_) => {
                let text = self.read_run();
                if matches!(self.current, Some((_, '('))) {
                    if !is_function_name(text) {
                        return Err(TokenizeError::InvalidFunctionName {
                            name: text.to_string(),
                            position: start,
                        });
                    }
                    Token::Func(text)
                } else {
                    Token::Package(text)
                }
            }
        };

        Ok(Spanned::new(token, start, self.position))
    }

    /// Advance to next character, updating position tracking.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let (_, ch) = self.current?;
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        self.current = self.chars.next();
        self.position.offset = self
            .current
            .map_or(self.source.len(), |(next_offset, _)| next_offset);
        Some(ch)
    }

    /// Read a contiguous run of non-delimiter characters.
    fn read_run(&mut self) -> &'a str {
        let start_offset = self.position.offset;
        while let Some((_, ch)) = self.current {
            if is_delimiter(ch) {
                break;
            }
            self.advance();
        }
        &self.source[start_offset..self.position.offset]
    }
}

/// Characters that end a package, function or selector run.
#[must_use]
pub fn is_delimiter(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | ',' | ':')
}

/// Function names start with a letter or `_`; parameters follow `=`.
fn is_function_name(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|ch| ch.is_alphanumeric() || matches!(ch, '_' | '='))
}

/// Tokenize a full expression, dropping the trailing `Eof`.
///
/// Blank input yields an empty vector.
///
/// # Errors
/// Propagates the first `TokenizeError` encountered.
pub fn tokenize(source: &str) -> Result<Vec<Spanned<Token<'_>>>, TokenizeError> {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.next_token()?;
        if token.value == Token::Eof {
            break;
        }
        tokens.push(token);
    }
    tracing::trace!(target: "pkgsel::tokenize", count = tokens.len(), "tokenized expression");
    Ok(tokens)
}

//! Core lexer implementation: the `Lexer` struct and its dispatch.

use mlisp_util::SourceError;

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Lexer over an s-expression source buffer.
///
/// Produced tokens own their text (an owned `String` for symbols) rather
/// than borrowing from the source, since the reader hands symbol names
/// straight on to `mlisp-heap::Heap::make_symbol`, which copies them again
/// regardless — there is no benefit to threading a borrow through.
pub struct Lexer<'a> {
    pub(crate) cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token, or a [`SourceError`] if the input can't be
    /// tokenized at the current position (spec §4.4: unknown character or
    /// symbol name too long).
    pub fn next_token(&mut self) -> Result<Token, SourceError> {
        self.skip_whitespace_and_comments();

        let start = self.cursor.position();
        if self.cursor.is_at_end() {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
            });
        }

        let c = self.cursor.current_char();
        let kind = match c {
            '(' => {
                self.cursor.advance();
                TokenKind::LParen
            }
            ')' => {
                self.cursor.advance();
                TokenKind::Cparen
            }
            '.' => {
                self.cursor.advance();
                TokenKind::Dot
            }
            '\'' => {
                self.cursor.advance();
                TokenKind::Quote
            }
            '-' if self.cursor.peek_char(1).is_ascii_digit() => self.lex_int()?,
            c if c.is_ascii_digit() => self.lex_int()?,
            c if is_symbol_start(c) => self.lex_symbol(start)?,
            c => {
                return Err(SourceError::new(
                    start,
                    format!("Don't know how to handle `{}`", c),
                ))
            }
        };

        Ok(Token { kind, start })
    }
}

/// Punctuation characters allowed in a symbol, per spec §4.4.
pub(crate) const SYMBOL_PUNCTUATION: &str = "~!@#$%^&*-_=+:/?<>";

pub(crate) fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic() || SYMBOL_PUNCTUATION.contains(c)
}

pub(crate) fn is_symbol_continue(c: char) -> bool {
    c.is_alphanumeric() || SYMBOL_PUNCTUATION.contains(c)
}

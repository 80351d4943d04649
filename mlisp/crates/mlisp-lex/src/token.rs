//! Token kinds produced by the lexer (spec §4.4).
//!
//! The grammar has no keywords and no multi-character operators: every
//! punctuation character that isn't `(`, `)`, `.`, or `'` is just more
//! symbol material (`+`, `<=`-as-two-symbol-chars-that-happen-to-lex-as-one,
//! etc.), so there is nothing here resembling a compiler's token zoo.

/// A lexical token together with the byte offset it started at, for error
/// reporting (spec §6: "a message string plus a byte offset").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A decimal integer, already parsed. A leading `-` is folded in here
    /// only when immediately followed by a digit (spec §4.4).
    Int(i64),
    /// A run of symbol-constituent characters, at most
    /// [`crate::SYMBOL_MAX_LEN`] bytes long.
    Symbol(String),
    /// `(`
    LParen,
    /// `)` — returned as a token rather than consumed implicitly, since the
    /// list grammar inspects it directly (spec §4.4's `list` production).
    Cparen,
    /// `.` as a standalone token (dotted-pair separator).
    Dot,
    /// `'`, rewritten by the reader into `(quote expr)`.
    Quote,
    /// End of input.
    Eof,
}

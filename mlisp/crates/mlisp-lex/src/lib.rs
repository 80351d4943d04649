//! # mlisp-lex - Lexical Analyzer
//!
//! Turns a single source buffer into a stream of [`Token`]s per spec §4.4.
//! The grammar is small on purpose: four punctuation tokens (`(`, `)`, `.`,
//! `'`), one integer literal form, and one symbol form built from a fixed
//! ASCII punctuation set — there are no keywords, no multi-character
//! operators, and no string or float literals to lex.
//!
//! Organized the way the teacher splits a lexer into one file per
//! token-kind concern (see [`lexer`]'s module doc), narrowed to what this
//! grammar actually has.

pub mod cursor;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};

/// Maximum length, in bytes, of a symbol token (spec §4.4). Mirrors
/// `mlisp_heap::SYMBOL_MAX_LEN`; duplicated rather than imported because
/// the lexer runs before any heap object exists and has no dependency on
/// `mlisp-heap`. `mlisp-reader` asserts the two stay equal in its tests.
pub const SYMBOL_MAX_LEN: usize = 200;

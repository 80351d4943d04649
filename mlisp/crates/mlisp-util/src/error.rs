//! Shared error taxonomy for the interpreter's front end.
//!
//! `mlisp-reader` and `mlisp-eval` both need to report a failure at a
//! specific byte offset into the single source buffer a program was read
//! from. `SourceError` is the one type both crates build and propagate so
//! a host embedding the interpreter gets a single, uniform error shape
//! back out of `Interpreter::eval_source` regardless of which phase failed.

use std::fmt;
use thiserror::Error;

/// A byte offset into the source buffer that was being read or evaluated.
///
/// Kept as a distinct type rather than a bare `usize` so call sites can't
/// accidentally pass a length or an index into some other collection where
/// an offset was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ByteOffset(pub usize);

impl fmt::Display for ByteOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ByteOffset {
    fn from(value: usize) -> Self {
        ByteOffset(value)
    }
}

/// An error produced while reading or evaluating a source buffer, carrying
/// the byte offset at which it occurred.
///
/// `message` holds the phase-specific description (a lexer, reader, or
/// evaluator error text); `SourceError` itself only owns the "where",
/// leaving the "what" to whichever crate raised it.
#[derive(Debug, Error)]
#[error("{message} (at byte {offset})")]
pub struct SourceError {
    pub offset: ByteOffset,
    pub message: String,
}

impl SourceError {
    pub fn new(offset: impl Into<ByteOffset>, message: impl Into<String>) -> Self {
        SourceError {
            offset: offset.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for anything that can fail with a located source error.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

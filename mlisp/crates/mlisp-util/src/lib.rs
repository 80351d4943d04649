//! Small shared pieces used by more than one interpreter crate.
//!
//! This crate intentionally stays tiny: the interpreter reads a single
//! source buffer, not a multi-file project, so there is no source map,
//! no interner, and no diagnostic renderer to share across phases — just
//! the one error type that needs to mean the same thing everywhere it's
//! raised.

pub mod error;

pub use error::{ByteOffset, SourceError, SourceResult};

//! Reader error type.
//!
//! A read can fail two different ways: the lexer/grammar rejects the text
//! (spec §4.4's six named parse errors, surfaced as [`SourceError`]), or
//! the heap runs out of space while allocating a cons cell or symbol
//! (surfaced as [`HeapError`]). Both carry enough information for
//! `mlisp-runtime::eval_source` to report a single uniform failure back to
//! the host, so this crate folds them into one enum rather than making
//! every caller match two unrelated error types.

use mlisp_heap::HeapError;
use mlisp_util::SourceError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Heap(#[from] HeapError),
}

pub type ReaderResult<T> = std::result::Result<T, ReaderError>;

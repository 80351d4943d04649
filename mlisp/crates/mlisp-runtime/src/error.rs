//! Embedding-layer error taxonomy (spec §7, §6): wraps every lower-layer
//! error plus the two lifecycle misuses (`NotCreated`, `AlreadyCreated`)
//! that only make sense once there's an `Interpreter` to misuse.

use mlisp_eval::EvalError;
use mlisp_heap::HeapError;
use mlisp_reader::ReaderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("interpreter has not been created")]
    NotCreated,

    #[error("interpreter is already created")]
    AlreadyCreated,

    #[error(transparent)]
    Heap(#[from] HeapError),

    #[error(transparent)]
    Read(#[from] ReaderError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

pub type RuntimeResult<T> = std::result::Result<T, RuntimeError>;

//! Evaluator error taxonomy (spec §7).

use mlisp_heap::HeapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("Undefined symbol: {0}")]
    Undefined(String),

    #[error("The object is not applicable: {0}")]
    NotCallable(String),

    #[error("{op}: {expected} expected")]
    WrongType {
        op: &'static str,
        expected: &'static str,
    },

    #[error("Malformed {form}: expected {expected}, got {got} argument(s)")]
    Arity {
        form: &'static str,
        expected: &'static str,
        got: usize,
    },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Multiplication overflow")]
    MultiplyOverflow,

    #[error("{0} is already defined")]
    Redefined(String),

    #[error("Cannot change constant {0}")]
    ConstantAssignment(String),

    #[error("Nested loops are prohibited")]
    NestedLoop,

    #[error("Task iteration limit exceeded")]
    TaskLimitExceeded,

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Heap(#[from] HeapError),
}

pub type EvalResult<T> = std::result::Result<T, EvalError>;

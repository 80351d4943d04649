//! Small helpers shared by the primitive implementations: walking a
//! rooted argument list without triggering further allocation, and the
//! arity/type checks every primitive repeats.

use mlisp_heap::{Tag, Value};

use crate::error::{EvalError, EvalResult};

/// Length of a (well-formed, `Nil`-terminated) list. Does not allocate.
pub(crate) fn list_len(mut v: Value) -> usize {
    let mut n = 0;
    while !v.is_nil() {
        n += 1;
        v = v.cdr();
    }
    n
}

/// Collects `v`'s elements into a `Vec<i64>`, erroring if any element is
/// not an `Int`. Safe to call on an already-rooted, already-evaluated
/// list: reading `car`/`cdr`/`as_int` never allocates.
pub(crate) fn collect_ints(mut v: Value, op: &'static str) -> EvalResult<Vec<i64>> {
    let mut out = Vec::with_capacity(list_len(v));
    while !v.is_nil() {
        let head = v.car();
        match head.as_int() {
            Some(n) => out.push(n),
            None => {
                return Err(EvalError::WrongType {
                    op,
                    expected: "an integer",
                })
            }
        }
        v = v.cdr();
    }
    Ok(out)
}

pub(crate) fn require_arity_exact(form: &'static str, got: usize, want: usize) -> EvalResult<()> {
    if got != want {
        return Err(EvalError::Arity {
            form,
            expected: arity_word(want),
            got,
        });
    }
    Ok(())
}

pub(crate) fn require_arity_min(form: &'static str, got: usize, min: usize) -> EvalResult<()> {
    if got < min {
        return Err(EvalError::Arity {
            form,
            expected: arity_word(min),
            got,
        });
    }
    Ok(())
}

fn arity_word(n: usize) -> &'static str {
    match n {
        0 => "0 arguments",
        1 => "1 argument",
        2 => "2 arguments",
        3 => "3 arguments",
        _ => "more arguments",
    }
}

pub(crate) fn require_cell(v: Value, op: &'static str) -> EvalResult<Value> {
    if v.tag() == Tag::Cell {
        Ok(v)
    } else {
        Err(EvalError::WrongType {
            op,
            expected: "a cell",
        })
    }
}

pub(crate) fn require_symbol(v: Value, op: &'static str) -> EvalResult<Value> {
    if v.tag() == Tag::Symbol {
        Ok(v)
    } else {
        Err(EvalError::WrongType {
            op,
            expected: "a symbol",
        })
    }
}

pub(crate) fn bool_value(b: bool) -> Value {
    if b {
        Value::true_()
    } else {
        Value::nil()
    }
}

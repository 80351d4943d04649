//! Printer (spec §4.8): serializes a value to text. Streams through any
//! `std::fmt::Write` sink rather than building into a fixed-size buffer —
//! this is the spec's own fix for the original implementation's
//! `LISP_MSG_BUF` overflow risk (see design notes), so `print`, error
//! messages, and a future REPL can all share one code path regardless of
//! how large the printed value turns out to be.

use std::fmt::{self, Write as _};

use mlisp_heap::{Tag, Value};

use crate::error::{EvalError, EvalResult};

fn wrap(r: fmt::Result) -> EvalResult<()> {
    r.map_err(|_| EvalError::Internal("formatting failed".into()))
}

/// Writes `v` to `w`. `Moved`/`Env`/`Dot`/`Cparen` should never reach the
/// printer (spec §4.8: "Moved is only expected internally; if encountered
/// by the printer it is a bug") — surfaced here as `EvalError::Internal`
/// rather than a panic, so a host embedding the interpreter gets a
/// reportable error instead of a crash.
pub fn print_value(w: &mut dyn fmt::Write, v: Value) -> EvalResult<()> {
    match v.tag() {
        Tag::Int => wrap(write!(w, "{}", v.as_int().expect("Int tag carries an i64 payload"))),
        Tag::Symbol => wrap(write!(w, "{}", v.symbol_name())),
        Tag::Cell => print_cell(w, v),
        Tag::Primitive => wrap(write!(w, "<primitive>")),
        Tag::Function => wrap(write!(w, "<function>")),
        Tag::Macro => wrap(write!(w, "<macro>")),
        Tag::True => wrap(write!(w, "#t")),
        Tag::Nil => wrap(write!(w, "()")),
        Tag::Env | Tag::Dot | Tag::Cparen | Tag::Moved => Err(EvalError::Internal(format!(
            "printer reached an internal-only tag: {:?}",
            v.tag()
        ))),
    }
}

fn print_cell(w: &mut dyn fmt::Write, v: Value) -> EvalResult<()> {
    wrap(write!(w, "("))?;
    let mut cur = v;
    let mut first = true;
    loop {
        if !first {
            wrap(write!(w, " "))?;
        }
        first = false;
        print_value(w, cur.car())?;
        let tail = cur.cdr();
        if tail.is_nil() {
            break;
        }
        if tail.tag() == Tag::Cell {
            cur = tail;
        } else {
            wrap(write!(w, " . "))?;
            print_value(w, tail)?;
            break;
        }
    }
    wrap(write!(w, ")"))
}

/// Convenience wrapper for call sites (error messages, `print`) that want
/// an owned `String` rather than a caller-supplied sink. `String`'s
/// `Write` impl never fails, so the only error path is an internal-only
/// tag reaching the printer, which is itself reported inline.
pub fn print_to_string(v: Value) -> String {
    let mut s = String::new();
    match print_value(&mut s, v) {
        Ok(()) => s,
        Err(e) => format!("<unprintable: {e}>"),
    }
}

//! Evaluation context: the handful of pieces of state every recursive
//! `eval`/`apply`/primitive call needs, bundled so call sites thread one
//! `&mut Ctx` instead of five separate parameters.
//!
//! `Ctx` is built fresh per top-level call (by `mlisp-runtime`'s
//! `eval_source`) rather than stored long-term on some owning struct: it
//! borrows the heap and symbol table mutably and the root stack and
//! primitive table by shared reference, and Rust has no good way to keep
//! a struct like that alive as a field of the thing it borrows from.

use mlisp_heap::{Heap, RootStack};

use crate::primitives::PrimitiveTable;
use crate::symtab::SymbolTable;

/// Bundles the mutable heap/symbol-table state, the read-only primitive
/// dispatch table, the host's output sink, and the one piece of
/// evaluator-local discipline state (`in_while`, spec §5's "nested while
/// is prohibited") that every recursive evaluation step needs access to.
pub struct Ctx<'a> {
    pub heap: &'a mut Heap,
    pub roots: &'a RootStack,
    pub symtab: &'a mut SymbolTable,
    pub primitives: &'a PrimitiveTable,
    pub output: &'a mut dyn FnMut(&str),
    /// The cooperative yield hook (spec §5), invoked once per `while`
    /// iteration. `None` when the embedder hasn't registered one.
    pub yield_cb: Option<&'a mut dyn FnMut()>,
    /// Guards against nested `while` (spec §5): set for the duration of a
    /// `while` form's body evaluation, checked on entry to a nested one.
    pub in_while: bool,
}

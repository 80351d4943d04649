//! Primitive/special-form catalogue and dispatch table (spec §4.7).
//!
//! Every entry here — whether it evaluates its arguments eagerly
//! (`arithmetic`, `compare`, `logical`, `list_ops`) or decides for itself
//! what to evaluate (`control`) — is represented identically at the
//! object-model level: a `Primitive` value carrying an opaque `u32` id.
//! `PrimitiveTable` is the `rustc_hash::FxHashMap`-backed mapping from
//! name to native function that `Heap::make_primitive`'s id indexes into,
//! built once at startup and never mutated — the same shape the corpus
//! reaches for whenever a dispatch table's keys are a closed, compile-time
//! known set rather than attacker-controlled text.

pub mod arithmetic;
pub mod compare;
pub mod control;
pub mod list_ops;
pub mod logical;

use mlisp_heap::{Handle, Heap, RootStack, Value};
use rustc_hash::FxHashMap;

use crate::env;
use crate::error::{EvalError, EvalResult};
use crate::symtab::SymbolTable;

/// A primitive's native signature (spec §4.7's "unevaluated argument
/// list" contract): the evaluation context, the calling environment, and
/// the raw (unevaluated) argument list.
pub type PrimitiveFn = fn(&mut crate::context::Ctx, &Handle, &Handle) -> EvalResult<Value>;

/// The full catalogue in a fixed order; a primitive's id (stored in its
/// heap `Primitive` object) is its index into this order.
const ENTRIES: &[(&str, PrimitiveFn)] = &[
    ("quote", control::quote),
    ("cons", list_ops::cons),
    ("car", list_ops::car),
    ("cdr", list_ops::cdr),
    ("setq", control::setq),
    ("setcar", list_ops::setcar),
    ("while", control::while_form),
    ("gensym", control::gensym),
    ("+", arithmetic::add),
    ("-", arithmetic::sub),
    ("*", arithmetic::mul),
    ("/", arithmetic::div),
    ("%", arithmetic::rem),
    ("<", compare::lt),
    ("<=", compare::le),
    (">", compare::gt),
    (">=", compare::ge),
    ("=", compare::num_eq),
    ("eq", compare::eq),
    ("not", logical::not),
    ("and", logical::and),
    ("or", logical::or),
    ("abs", arithmetic::abs),
    ("if", control::if_form),
    ("define", control::define),
    ("defun", control::defun),
    ("defmacro", control::defmacro),
    ("lambda", control::lambda),
    ("macroexpand", control::macroexpand),
    ("print", control::print),
    ("eval", control::eval_prim),
    ("list", list_ops::list),
];

pub struct PrimitiveTable {
    names: Vec<&'static str>,
    by_name: FxHashMap<&'static str, PrimitiveFn>,
}

impl PrimitiveTable {
    pub fn build() -> Self {
        let mut names = Vec::with_capacity(ENTRIES.len());
        let mut by_name = FxHashMap::default();
        for (name, f) in ENTRIES.iter().copied() {
            names.push(name);
            by_name.insert(name, f);
        }
        PrimitiveTable { names, by_name }
    }

    pub(crate) fn lookup(&self, id: u32) -> EvalResult<PrimitiveFn> {
        let name = *self
            .names
            .get(id as usize)
            .ok_or_else(|| EvalError::Internal(format!("no primitive registered for id {id}")))?;
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| EvalError::Internal(format!("primitive table corrupt for `{name}`")))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    /// Appends a host-registered primitive (spec §6's `add_primitive`) and
    /// returns its id. Unlike the fixed `ENTRIES` catalogue this can be
    /// called after `build()`, so embedders can extend the dispatch table
    /// at runtime; the caller is responsible for binding `name` to a fresh
    /// `Primitive` value carrying the returned id.
    pub fn insert(&mut self, name: &'static str, f: PrimitiveFn) -> u32 {
        let id = self.names.len() as u32;
        self.names.push(name);
        self.by_name.insert(name, f);
        id
    }
}

impl Default for PrimitiveTable {
    fn default() -> Self {
        Self::build()
    }
}

/// Seeds `env` with one `Primitive` binding per catalogue entry, in
/// table order, so each one's id matches its index into `ENTRIES`.
pub fn install(
    table: &PrimitiveTable,
    heap: &mut Heap,
    roots: &RootStack,
    symtab: &mut SymbolTable,
    env: &Handle,
) -> EvalResult<()> {
    for (id, name) in table.names().enumerate() {
        let scope = roots.push_frame(2);
        let sym = scope.slot(0);
        let prim = scope.slot(1);
        sym.set(symtab.intern(heap, roots, name)?);
        prim.set(heap.make_primitive(roots, id as u32)?);
        env::define(heap, roots, env, &sym, &prim)?;
    }
    Ok(())
}

/// Seeds `#t`, `#itr`, `#version` (spec §4.7).
pub fn define_constants(
    heap: &mut Heap,
    roots: &RootStack,
    symtab: &mut SymbolTable,
    env: &Handle,
) -> EvalResult<()> {
    let scope = roots.push_frame(2);
    let sym = scope.slot(0);
    let val = scope.slot(1);

    sym.set(symtab.intern(heap, roots, "#t")?);
    val.set(Value::true_());
    env::define(heap, roots, env, &sym, &val)?;

    sym.set(symtab.intern(heap, roots, "#itr")?);
    val.set(heap.make_int(roots, 0)?);
    env::define(heap, roots, env, &sym, &val)?;

    sym.set(symtab.intern(heap, roots, "#version")?);
    val.set(heap.make_int(roots, crate::VERSION)?);
    env::define(heap, roots, env, &sym, &val)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalogue_entry_round_trips_through_its_id() {
        let table = PrimitiveTable::build();
        for (id, name) in table.names().enumerate() {
            let found = table.lookup(id as u32).unwrap();
            let expected = table.by_name[name];
            assert_eq!(found as usize, expected as usize);
        }
    }

    #[test]
    fn unknown_id_is_an_internal_error() {
        let table = PrimitiveTable::build();
        let err = table.lookup(table.names.len() as u32).unwrap_err();
        assert!(matches!(err, EvalError::Internal(_)));
    }
}

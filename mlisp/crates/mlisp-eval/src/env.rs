//! Environment model (spec §4.6): a linked list of `Env(vars, up)` frames,
//! `vars` an association list of `(symbol . value)` cells. Lookup returns
//! the binding *cell* itself, not just the value, so `setq` can mutate its
//! `cdr` in place (the glossary's "binding cell" — this is also how a
//! `lambda`'s free variables stay live-by-reference after the defining
//! scope mutates them: spec testable property 4).

use mlisp_heap::{Handle, Heap, RootStack, Value};

use crate::error::{EvalError, EvalResult};

/// Walks `vars` (a list of `(symbol . value)` cells) for one whose `car`
/// is pointer-identical to `sym`.
fn find_in_frame(vars: Value, sym: Value) -> Option<Value> {
    let mut cur = vars;
    while !cur.is_nil() {
        let cell = cur.car();
        if cell.car() == sym {
            return Some(cell);
        }
        cur = cur.cdr();
    }
    None
}

/// Looks up `sym` starting at `env`, walking `up`-ward. Returns the
/// binding cell, not the value (spec §4.6).
pub fn lookup(env: Value, sym: Value) -> Option<Value> {
    let mut frame = env;
    while !frame.is_nil() {
        if let Some(cell) = find_in_frame(frame.vars(), sym) {
            return Some(cell);
        }
        frame = frame.up();
    }
    None
}

/// `define`/`defun`/`defmacro`: binds `sym` to `val` in the *current*
/// frame only. Errors if `sym` is already bound in that same frame (spec
/// §4.7's `define` contract); shadowing a binding from an enclosing frame
/// is fine and ordinary.
pub fn define(
    heap: &mut Heap,
    roots: &RootStack,
    env: &Handle,
    sym: &Handle,
    val: &Handle,
) -> EvalResult<()> {
    if find_in_frame(env.get().vars(), sym.get()).is_some() {
        return Err(EvalError::Redefined(sym.get().symbol_name().to_string()));
    }
    let scope = roots.push_frame(2);
    let cell = scope.slot(0);
    let rest = scope.slot(1);
    cell.set(heap.cons(roots, sym, val)?);
    rest.set(env.get().vars());
    let new_vars = heap.cons(roots, &cell, &rest)?;
    env.get().set_vars(new_vars);
    Ok(())
}

/// Builds a fresh frame extending `up`, binding `params` (a proper or
/// dotted list of symbols) to `args` (a proper list of already-evaluated
/// values for a `Function`, or the raw unevaluated forms for a `Macro`).
/// A dotted parameter list's trailing symbol is bound to the list of
/// remaining arguments (spec §4.6).
pub fn extend(
    heap: &mut Heap,
    roots: &RootStack,
    params: &Handle,
    args: &Handle,
    up: &Handle,
) -> EvalResult<Value> {
    let scope = roots.push_frame(4);
    let vars = scope.slot(0);
    let p = scope.slot(1);
    let a = scope.slot(2);
    let cell = scope.slot(3);
    vars.set(Value::nil());
    p.set(params.get());
    a.set(args.get());

    loop {
        match p.get().tag() {
            mlisp_heap::Tag::Nil => {
                if !a.get().is_nil() {
                    return Err(EvalError::Arity {
                        form: "function call",
                        expected: "fewer arguments",
                        got: list_len(a.get()),
                    });
                }
                break;
            }
            mlisp_heap::Tag::Symbol => {
                // dotted tail: bind the remaining symbol to the rest of args
                cell.set(heap.cons(roots, &p, &a)?);
                let new_vars = heap.cons(roots, &cell, &vars)?;
                vars.set(new_vars);
                break;
            }
            mlisp_heap::Tag::Cell => {
                if a.get().is_nil() {
                    return Err(EvalError::Arity {
                        form: "function call",
                        expected: "more arguments",
                        got: 0,
                    });
                }
                let inner = roots.push_frame(2);
                let param_sym = inner.slot(0);
                let arg_val = inner.slot(1);
                param_sym.set(p.get().car());
                arg_val.set(a.get().car());
                let bound = heap.cons(roots, &param_sym, &arg_val)?;
                cell.set(bound);
                let new_vars = heap.cons(roots, &cell, &vars)?;
                vars.set(new_vars);
                p.set(p.get().cdr());
                a.set(a.get().cdr());
            }
            _ => return Err(EvalError::Internal("malformed parameter list".into())),
        }
    }

    Ok(heap.make_env(roots, &vars, up)?)
}

fn list_len(mut v: Value) -> usize {
    let mut n = 0;
    while !v.is_nil() {
        n += 1;
        v = v.cdr();
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlisp_heap::HeapConfig;

    #[test]
    fn lookup_returns_the_binding_cell() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let scope = roots.push_frame(5);
        let up = scope.slot(0);
        let sym = scope.slot(1);
        let val = scope.slot(2);
        let env = scope.slot(3);

        up.set(Value::nil());
        env.set(heap.make_env(&roots, &up, &up).unwrap());
        sym.set(heap.make_symbol(&roots, "x").unwrap());
        val.set(heap.make_int(&roots, 10).unwrap());
        define(&mut heap, &roots, &env, &sym, &val).unwrap();

        let cell = lookup(env.get(), sym.get()).unwrap();
        assert_eq!(cell.cdr().as_int(), Some(10));

        // mutating the cell's cdr re-binds the symbol (what `setq` does)
        let new_val = scope.slot(4);
        new_val.set(heap.make_int(&roots, 20).unwrap());
        cell.set_cdr(new_val.get());
        let cell2 = lookup(env.get(), sym.get()).unwrap();
        assert_eq!(cell2.cdr().as_int(), Some(20));
    }

    #[test]
    fn redefining_in_the_same_frame_is_an_error() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let scope = roots.push_frame(4);
        let up = scope.slot(0);
        let sym = scope.slot(1);
        let val = scope.slot(2);
        let env = scope.slot(3);

        up.set(Value::nil());
        env.set(heap.make_env(&roots, &up, &up).unwrap());
        sym.set(heap.make_symbol(&roots, "x").unwrap());
        val.set(heap.make_int(&roots, 1).unwrap());
        define(&mut heap, &roots, &env, &sym, &val).unwrap();
        let err = define(&mut heap, &roots, &env, &sym, &val).unwrap_err();
        assert!(matches!(err, EvalError::Redefined(_)));
    }
}

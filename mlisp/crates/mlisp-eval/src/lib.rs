//! # mlisp-eval - Symbol Table, Environment, Evaluator, Printer
//!
//! Everything above the reader and below the embedding shell (spec
//! §4.5-§4.8): the obarray, association-list environment frames, the
//! tag-dispatch evaluator with its primitive/special-form catalogue, and
//! the printer. `mlisp-runtime` builds an [`Interpreter`] around a
//! [`context::Ctx`] it constructs fresh for each `eval_source` call.

pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod eval;
pub mod primitives;
pub mod printer;
pub mod symtab;
mod util;

pub use config::TaskConfig;
pub use context::Ctx;
pub use error::{EvalError, EvalResult};
pub use eval::eval;
pub use primitives::{define_constants, install as install_primitives, PrimitiveFn, PrimitiveTable};
pub use symtab::SymbolTable;

/// The interpreter's semantic version, encoded as `major*10000 +
/// minor*100 + patch` (spec §4.7, §6) — bound to `#version` at startup.
/// Tracks the Lisp dialect this crate implements, not the Cargo crate's
/// own version.
pub const VERSION: i64 = 203;

#[cfg(test)]
mod tests {
    use super::*;
    use mlisp_heap::{Heap, HeapConfig, RootStack};

    fn eval_str(src: &str) -> String {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let mut symtab = SymbolTable::new(&roots);
        let table = PrimitiveTable::build();

        let env_scope = roots.push_frame(2);
        let nil = env_scope.slot(0);
        let env = env_scope.slot(1);
        nil.set(mlisp_heap::Value::nil());
        env.set(heap.make_env(&roots, &nil, &nil).unwrap());

        define_constants(&mut heap, &roots, &mut symtab, &env).unwrap();
        install_primitives(&table, &mut heap, &roots, &mut symtab, &env).unwrap();

        let result_scope = roots.push_frame(1);
        let last = result_scope.slot(0);
        last.set(mlisp_heap::Value::nil());

        let mut out = String::new();
        let mut sink = |s: &str| out.push_str(s);
        let mut reader = mlisp_reader::Reader::new(src);

        loop {
            let form_scope = roots.push_frame(1);
            let form_handle = form_scope.slot(0);
            match reader.read(&mut heap, &roots, &mut symtab).unwrap() {
                None => break,
                Some(form) => {
                    form_handle.set(form);
                    let mut ctx = Ctx {
                        heap: &mut heap,
                        roots: &roots,
                        symtab: &mut symtab,
                        primitives: &table,
                        output: &mut sink,
                        yield_cb: None,
                        in_while: false,
                    };
                    last.set(eval::eval(&mut ctx, &env, &form_handle).unwrap());
                }
            }
        }
        let _ = &out;
        printer::print_to_string(last.get())
    }

    #[test]
    fn s1_sums_to_six() {
        assert_eq!(eval_str("(+ 1 2 3)"), "6");
    }

    #[test]
    fn s2_factorial_of_five() {
        let src = "(define fact (lambda (n) (if (= n 0) 1 (* n (fact (- n 1)))))) (fact 5)";
        assert_eq!(eval_str(src), "120");
    }

    #[test]
    fn s3_odd_predicate_via_defun() {
        let src = "(defun odd (n) (= 1 (% n 2))) (list (odd 1) (odd 2))";
        assert_eq!(eval_str(src), "(#t ())");
    }

    #[test]
    fn s5_unless_macro() {
        let src = "(defmacro unless (c e) (list 'if c () e)) (unless () 42)";
        assert_eq!(eval_str(src), "42");
    }

    #[test]
    fn environment_hygiene_binding_cell_capture() {
        let src = "(define x 1) (define add1 (lambda (y) (+ x y))) (setq x 2) (add1 10)";
        assert_eq!(eval_str(src), "12");
    }
}

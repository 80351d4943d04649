//! `+ - * / % abs` (spec §4.7). Each primitive evaluates its operands
//! itself (it receives the unevaluated argument list, as every primitive
//! does), then drops down to native `i64` arithmetic — once an operand
//! has been read out via `Value::as_int`, no further allocation happens
//! until the final `make_int`, so nothing here needs extra rooting
//! beyond the evaluated argument list itself.

use mlisp_heap::Handle;

use crate::context::Ctx;
use crate::error::{EvalError, EvalResult};
use crate::eval::eval_list;
use crate::util::{collect_ints, require_arity_exact, require_arity_min};

pub fn add(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<mlisp_heap::Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), "+")?;
    require_arity_min("+", nums.len(), 1)?;
    let sum = nums.iter().fold(0i64, |acc, n| acc.wrapping_add(*n));
    ctx.heap.make_int(ctx.roots, sum).map_err(EvalError::from)
}

pub fn sub(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<mlisp_heap::Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), "-")?;
    require_arity_min("-", nums.len(), 1)?;
    let result = if nums.len() == 1 {
        nums[0].wrapping_neg()
    } else {
        nums[1..].iter().fold(nums[0], |acc, n| acc.wrapping_sub(*n))
    };
    ctx.heap
        .make_int(ctx.roots, result)
        .map_err(EvalError::from)
}

pub fn mul(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<mlisp_heap::Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), "*")?;
    require_arity_min("*", nums.len(), 2)?;
    let mut acc = nums[0];
    for n in &nums[1..] {
        acc = acc.checked_mul(*n).ok_or(EvalError::MultiplyOverflow)?;
    }
    ctx.heap.make_int(ctx.roots, acc).map_err(EvalError::from)
}

pub fn div(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<mlisp_heap::Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), "/")?;
    require_arity_min("/", nums.len(), 2)?;
    if nums[0] == 0 {
        return ctx.heap.make_int(ctx.roots, 0).map_err(EvalError::from);
    }
    let mut acc = nums[0] as f64;
    for n in &nums[1..] {
        if *n == 0 {
            return Err(EvalError::DivisionByZero);
        }
        acc /= *n as f64;
    }
    ctx.heap
        .make_int(ctx.roots, acc.trunc() as i64)
        .map_err(EvalError::from)
}

pub fn rem(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<mlisp_heap::Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), "%")?;
    require_arity_exact("%", nums.len(), 2)?;
    if nums[1] == 0 {
        return Err(EvalError::ModuloByZero);
    }
    ctx.heap
        .make_int(ctx.roots, nums[0] % nums[1])
        .map_err(EvalError::from)
}

pub fn abs(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<mlisp_heap::Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), "abs")?;
    require_arity_exact("abs", nums.len(), 1)?;
    ctx.heap
        .make_int(ctx.roots, nums[0].wrapping_abs())
        .map_err(EvalError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::PrimitiveTable;
    use crate::symtab::SymbolTable;
    use mlisp_heap::{Heap, HeapConfig, RootStack};

    fn run(src_args: &[i64], f: super::super::PrimitiveFn) -> EvalResult<i64> {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let mut symtab = SymbolTable::new(&roots);
        let table = PrimitiveTable::build();
        let mut sink = |_: &str| {};
        let mut ctx = Ctx {
            heap: &mut heap,
            roots: &roots,
            symtab: &mut symtab,
            primitives: &table,
            output: &mut sink,
            yield_cb: None,
            in_while: false,
        };
        let env_scope = ctx.roots.push_frame(2);
        let nil = env_scope.slot(0);
        let env = env_scope.slot(1);
        nil.set(mlisp_heap::Value::nil());
        env.set(ctx.heap.make_env(ctx.roots, &nil, &nil).unwrap());

        let list_scope = ctx.roots.push_frame(1);
        let list = list_scope.slot(0);
        list.set(mlisp_heap::Value::nil());
        for n in src_args.iter().rev() {
            let inner = ctx.roots.push_frame(2);
            let int_val = inner.slot(0);
            let rest = inner.slot(1);
            int_val.set(ctx.heap.make_int(ctx.roots, *n).unwrap());
            rest.set(list.get());
            list.set(ctx.heap.cons(ctx.roots, &int_val, &rest).unwrap());
        }
        f(&mut ctx, &env, &list).map(|v| v.as_int().unwrap())
    }

    #[test]
    fn add_sums_all_operands() {
        assert_eq!(run(&[1, 2, 3], add).unwrap(), 6);
    }

    #[test]
    fn sub_with_one_arg_negates() {
        assert_eq!(run(&[5], sub).unwrap(), -5);
    }

    #[test]
    fn sub_with_many_args_folds_left() {
        assert_eq!(run(&[10, 1, 2], sub).unwrap(), 7);
    }

    #[test]
    fn mul_overflow_errors() {
        let err = run(&[i64::MAX, 2], mul).unwrap_err();
        assert!(matches!(err, EvalError::MultiplyOverflow));
    }

    #[test]
    fn div_short_circuits_when_dividend_is_zero() {
        assert_eq!(run(&[0, 5], div).unwrap(), 0);
    }

    #[test]
    fn div_by_zero_errors() {
        let err = run(&[1, 0], div).unwrap_err();
        assert!(matches!(err, EvalError::DivisionByZero));
    }

    #[test]
    fn rem_by_zero_errors() {
        let err = run(&[1, 0], rem).unwrap_err();
        assert!(matches!(err, EvalError::ModuloByZero));
    }

    #[test]
    fn abs_of_negative() {
        assert_eq!(run(&[-7], abs).unwrap(), 7);
    }
}

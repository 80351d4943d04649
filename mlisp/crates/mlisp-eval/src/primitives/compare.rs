//! `< <= > >= =` and `eq` (spec §4.7): binary, eager, boolean-valued.

use mlisp_heap::{Handle, Value};

use crate::context::Ctx;
use crate::error::EvalResult;
use crate::eval::eval_list;
use crate::util::{bool_value, collect_ints, require_arity_exact};

fn numeric_compare(
    ctx: &mut Ctx,
    env: &Handle,
    args: &Handle,
    name: &'static str,
    op: fn(i64, i64) -> bool,
) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let nums = collect_ints(evaluated.get(), name)?;
    require_arity_exact(name, nums.len(), 2)?;
    Ok(bool_value(op(nums[0], nums[1])))
}

pub fn lt(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    numeric_compare(ctx, env, args, "<", |a, b| a < b)
}

pub fn le(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    numeric_compare(ctx, env, args, "<=", |a, b| a <= b)
}

pub fn gt(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    numeric_compare(ctx, env, args, ">", |a, b| a > b)
}

pub fn ge(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    numeric_compare(ctx, env, args, ">=", |a, b| a >= b)
}

pub fn num_eq(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    numeric_compare(ctx, env, args, "=", |a, b| a == b)
}

/// `eq`: pointer identity (spec §4.7, §8 testable property 2).
pub fn eq(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let list = evaluated.get();
    require_arity_exact("eq", crate::util::list_len(list), 2)?;
    let a = list.car();
    let b = list.cdr().car();
    Ok(bool_value(a == b))
}

//! `not` `and` `or` (spec §4.7): eager, boolean-result logical operators
//! over Nil/True/Int (Int `0` is false, per the language's truthiness
//! rule). Unlike most Lisps' `and`/`or`, these do not short-circuit and
//! do not return the last operand's value — the spec describes them as
//! boolean-valued ("Logical"), matching the source's plain truth-table
//! primitives rather than Scheme's value-returning special forms.

use mlisp_heap::{Handle, Value};

use crate::context::Ctx;
use crate::error::EvalResult;
use crate::eval::eval_list;
use crate::util::{bool_value, list_len, require_arity_exact, require_arity_min};

pub fn not(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let list = evaluated.get();
    require_arity_exact("not", list_len(list), 1)?;
    Ok(bool_value(list.car().is_falsy()))
}

pub fn and(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let mut cur = evaluated.get();
    require_arity_min("and", list_len(cur), 2)?;
    let mut result = true;
    while !cur.is_nil() {
        if cur.car().is_falsy() {
            result = false;
        }
        cur = cur.cdr();
    }
    Ok(bool_value(result))
}

pub fn or(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let mut cur = evaluated.get();
    require_arity_min("or", list_len(cur), 2)?;
    let mut result = false;
    while !cur.is_nil() {
        if !cur.car().is_falsy() {
            result = true;
        }
        cur = cur.cdr();
    }
    Ok(bool_value(result))
}

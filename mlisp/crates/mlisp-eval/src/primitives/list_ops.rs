//! `cons` `car` `cdr` `setcar` `list` (spec §4.7): all eager primitives.

use mlisp_heap::{Handle, Value};

use crate::context::Ctx;
use crate::error::EvalResult;
use crate::eval::eval_list;
use crate::util::{list_len, require_arity_exact, require_cell};

pub fn cons(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(3);
    let evaluated = scope.slot(0);
    let a = scope.slot(1);
    let d = scope.slot(2);
    evaluated.set(eval_list(ctx, env, args)?);
    let list = evaluated.get();
    require_arity_exact("cons", list_len(list), 2)?;
    a.set(list.car());
    d.set(list.cdr().car());
    Ok(ctx.heap.cons(ctx.roots, &a, &d)?)
}

pub fn car(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let list = evaluated.get();
    require_arity_exact("car", list_len(list), 1)?;
    let cell = require_cell(list.car(), "car")?;
    Ok(cell.car())
}

pub fn cdr(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let list = evaluated.get();
    require_arity_exact("cdr", list_len(list), 1)?;
    let cell = require_cell(list.car(), "cdr")?;
    Ok(cell.cdr())
}

/// `(setcar c e)` mutates `c`'s `car` in place and returns `c` itself, so
/// a caller can chain further cell operations against the same object.
pub fn setcar(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval_list(ctx, env, args)?);
    let list = evaluated.get();
    require_arity_exact("setcar", list_len(list), 2)?;
    let cell = require_cell(list.car(), "setcar")?;
    cell.set_car(list.cdr().car());
    Ok(cell)
}

pub fn list(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    eval_list(ctx, env, args)
}

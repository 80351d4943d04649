//! The evaluator (spec §4.7): tag dispatch, symbol lookup, macroexpansion-
//! before-evaluation, and function/macro application.

use mlisp_heap::{Handle, Tag, Value};

use crate::context::Ctx;
use crate::env;
use crate::error::{EvalError, EvalResult};
use crate::printer;

/// Evaluates `expr` in `env`. Int/Primitive/Function/Macro/True/Nil are
/// self-evaluating; a Symbol looks itself up; a Cell is an application.
pub fn eval(ctx: &mut Ctx, env: &Handle, expr: &Handle) -> EvalResult<Value> {
    match expr.get().tag() {
        Tag::Int | Tag::Primitive | Tag::Function | Tag::Macro | Tag::True | Tag::Nil => {
            Ok(expr.get())
        }
        Tag::Symbol => match env::lookup(env.get(), expr.get()) {
            Some(cell) => Ok(cell.cdr()),
            None => Err(EvalError::Undefined(expr.get().symbol_name().to_string())),
        },
        Tag::Cell => eval_application(ctx, env, expr),
        Tag::Env | Tag::Dot | Tag::Cparen | Tag::Moved => Err(EvalError::Internal(format!(
            "unexpected tag reached eval: {:?}",
            expr.get().tag()
        ))),
    }
}

fn eval_application(ctx: &mut Ctx, env: &Handle, expr: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(3);
    let head_form = scope.slot(0);
    let args_form = scope.slot(1);
    let callable = scope.slot(2);
    head_form.set(expr.get().car());
    args_form.set(expr.get().cdr());

    if head_form.get().tag() == Tag::Symbol {
        if let Some(cell) = env::lookup(env.get(), head_form.get()) {
            if cell.cdr().tag() == Tag::Macro {
                let inner = ctx.roots.push_frame(2);
                let macro_val = inner.slot(0);
                let expansion = inner.slot(1);
                macro_val.set(cell.cdr());
                expansion.set(expand_macro_once(ctx, &macro_val, &args_form)?);
                return eval(ctx, env, &expansion);
            }
        }
    }

    callable.set(eval(ctx, env, &head_form)?);
    match callable.get().tag() {
        Tag::Primitive => {
            let id = callable.get().primitive_id();
            let func = ctx.primitives.lookup(id)?;
            func(ctx, env, &args_form)
        }
        Tag::Function => {
            let inner = ctx.roots.push_frame(1);
            let evaluated = inner.slot(0);
            evaluated.set(eval_list(ctx, env, &args_form)?);
            apply_function(ctx, &callable, &evaluated)
        }
        _ => Err(EvalError::NotCallable(printer::print_to_string(
            callable.get(),
        ))),
    }
}

/// Evaluates a lambda/macro body (a list of forms), sequentially, in
/// `env`, returning the last value (`Nil` for an empty body).
pub(crate) fn eval_body(ctx: &mut Ctx, env: &Handle, body: &Handle) -> EvalResult<Value> {
    if body.get().is_nil() {
        return Ok(Value::nil());
    }
    let scope = ctx.roots.push_frame(2);
    let cur = scope.slot(0);
    let result = scope.slot(1);
    cur.set(body.get());
    loop {
        let inner = ctx.roots.push_frame(1);
        let form = inner.slot(0);
        form.set(cur.get().car());
        result.set(eval(ctx, env, &form)?);
        let next = cur.get().cdr();
        if next.is_nil() {
            break;
        }
        cur.set(next);
    }
    Ok(result.get())
}

/// Evaluates each element of `args` (a proper list) left to right,
/// returning a freshly consed list of the results.
pub(crate) fn eval_list(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    if args.get().is_nil() {
        return Ok(Value::nil());
    }
    let scope = ctx.roots.push_frame(3);
    let head_form = scope.slot(0);
    let rest_form = scope.slot(1);
    let head_val = scope.slot(2);
    head_form.set(args.get().car());
    rest_form.set(args.get().cdr());
    head_val.set(eval(ctx, env, &head_form)?);
    let rest_val = eval_list(ctx, env, &rest_form)?;
    rest_form.set(rest_val);
    Ok(ctx.heap.cons(ctx.roots, &head_val, &rest_form)?)
}

/// Applies `func` (a `Function` or `Macro`) to `args` — already evaluated
/// for a `Function`, left raw for a `Macro` — by extending its captured
/// environment with a fresh frame and evaluating its body there.
pub(crate) fn apply_function(ctx: &mut Ctx, func: &Handle, args: &Handle) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(4);
    let params = scope.slot(0);
    let body = scope.slot(1);
    let closure_env = scope.slot(2);
    let new_env = scope.slot(3);
    params.set(func.get().params());
    body.set(func.get().body());
    closure_env.set(func.get().closure_env());
    new_env.set(env::extend(ctx.heap, ctx.roots, &params, args, &closure_env)?);
    eval_body(ctx, &new_env, &body)
}

/// One step of macroexpansion: binds `macro_val`'s parameters to the raw,
/// unevaluated `raw_args` and evaluates its body, without evaluating the
/// result (that is the caller's job — spec §4.7 macroexpand, and `eval`'s
/// Cell dispatch above, which re-evaluates the expansion in the call
/// site's environment rather than the macro's).
pub(crate) fn expand_macro_once(
    ctx: &mut Ctx,
    macro_val: &Handle,
    raw_args: &Handle,
) -> EvalResult<Value> {
    apply_function(ctx, macro_val, raw_args)
}

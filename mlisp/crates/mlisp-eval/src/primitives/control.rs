//! Special forms (spec §4.7): the primitives that decide for themselves
//! which, if any, of their operands to evaluate. Represented identically
//! to the eager primitives at the object-model level — a `Primitive`
//! value carrying an opaque id — the distinction is purely in what each
//! native function does with the raw argument list it receives.

use mlisp_heap::{Handle, Tag, Value};

use crate::context::Ctx;
use crate::env;
use crate::error::{EvalError, EvalResult};
use crate::eval;
use crate::printer;
use crate::util::{list_len, require_arity_exact, require_arity_min, require_cell, require_symbol};

/// `#itr` is deliberately absent here, unlike `#t`/`#version`: spec S4
/// (`(setq #itr 0) (while (< #itr 3) (print #itr))`) requires ordinary
/// `setq` against it to succeed. `while` additionally resets and bumps
/// `#itr` on its own, by a direct write to its binding cell (below), but
/// that is on top of `setq` remaining usable, not instead of it.
fn is_constant_name(name: &str) -> bool {
    matches!(name, "#t" | "#version")
}

pub fn quote(_ctx: &mut Ctx, _env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_exact("quote", list_len(args.get()), 1)?;
    Ok(args.get().car())
}

/// `(setq s e)`: `s` is read unevaluated; it must already be bound and
/// must not be `#t` or `#version` (spec §4.7, §8 testable property 7 —
/// `#itr` is intentionally not one of these, see `is_constant_name`).
pub fn setq(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_exact("setq", list_len(args.get()), 2)?;
    let scope = ctx.roots.push_frame(3);
    let sym = scope.slot(0);
    let expr_form = scope.slot(1);
    let cell = scope.slot(2);
    sym.set(require_symbol(args.get().car(), "setq")?);
    expr_form.set(args.get().cdr().car());

    let name = sym.get().symbol_name();
    if is_constant_name(name) {
        return Err(EvalError::ConstantAssignment(name.to_string()));
    }
    let found = env::lookup(env.get(), sym.get()).ok_or_else(|| EvalError::Undefined(name.to_string()))?;
    cell.set(found);
    let val = eval::eval(ctx, env, &expr_form)?;
    cell.get().set_cdr(val);
    Ok(val)
}

/// `(while cond body…)` (spec §5): bounded by the caller's patience, not
/// by an iteration cap — the `task` primitive is what the embedding
/// layer bounds. Nested `while` is rejected; `#itr` is reset to 0 on
/// entry and bumped after every body execution via a direct write to its
/// binding cell (the documented privileged exception to its constancy).
pub fn while_form(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    if ctx.in_while {
        return Err(EvalError::NestedLoop);
    }
    require_arity_min("while", list_len(args.get()), 1)?;
    let scope = ctx.roots.push_frame(3);
    let cond_form = scope.slot(0);
    let body = scope.slot(1);
    let itr_sym = scope.slot(2);
    cond_form.set(args.get().car());
    body.set(args.get().cdr());
    itr_sym.set(ctx.symtab.intern(ctx.heap, ctx.roots, "#itr")?);

    ctx.in_while = true;
    let result = run_while(ctx, env, &cond_form, &body, &itr_sym);
    ctx.in_while = false;
    result
}

fn run_while(
    ctx: &mut Ctx,
    env: &Handle,
    cond_form: &Handle,
    body: &Handle,
    itr_sym: &Handle,
) -> EvalResult<Value> {
    reset_itr(ctx, env, itr_sym)?;
    loop {
        let cond_val = eval::eval(ctx, env, cond_form)?;
        if cond_val.is_falsy() {
            break;
        }
        eval::eval_body(ctx, env, body)?;
        bump_itr(ctx, env, itr_sym)?;
        if let Some(cb) = ctx.yield_cb.as_deref_mut() {
            cb();
        }
    }
    Ok(Value::nil())
}

fn itr_cell(env: &Handle, itr_sym: &Handle) -> EvalResult<Value> {
    env::lookup(env.get(), itr_sym.get()).ok_or_else(|| EvalError::Internal("#itr is not bound".into()))
}

fn reset_itr(ctx: &mut Ctx, env: &Handle, itr_sym: &Handle) -> EvalResult<()> {
    let scope = ctx.roots.push_frame(2);
    let cell = scope.slot(0);
    let zero = scope.slot(1);
    cell.set(itr_cell(env, itr_sym)?);
    zero.set(ctx.heap.make_int(ctx.roots, 0)?);
    cell.get().set_cdr(zero.get());
    Ok(())
}

fn bump_itr(ctx: &mut Ctx, env: &Handle, itr_sym: &Handle) -> EvalResult<()> {
    let scope = ctx.roots.push_frame(2);
    let cell = scope.slot(0);
    let next = scope.slot(1);
    cell.set(itr_cell(env, itr_sym)?);
    let current = cell.get().cdr().as_int().unwrap_or(0);
    next.set(ctx.heap.make_int(ctx.roots, current.wrapping_add(1))?);
    cell.get().set_cdr(next.get());
    Ok(())
}

pub fn gensym(ctx: &mut Ctx, _env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_exact("gensym", list_len(args.get()), 0)?;
    Ok(ctx.symtab.gensym(ctx.heap, ctx.roots)?)
}

/// `(if c t e…)`: the `else` clause is a sequence, as a lambda body is.
pub fn if_form(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_min("if", list_len(args.get()), 2)?;
    let scope = ctx.roots.push_frame(3);
    let cond_form = scope.slot(0);
    let then_form = scope.slot(1);
    let else_forms = scope.slot(2);
    cond_form.set(args.get().car());
    then_form.set(args.get().cdr().car());
    else_forms.set(args.get().cdr().cdr());

    let cond_val = eval::eval(ctx, env, &cond_form)?;
    if !cond_val.is_falsy() {
        eval::eval(ctx, env, &then_form)
    } else {
        eval::eval_body(ctx, env, &else_forms)
    }
}

/// `(define sym val)`: binds in the current frame only; errors if `sym`
/// is already bound there (spec §4.6/§4.7).
pub fn define(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_exact("define", list_len(args.get()), 2)?;
    let scope = ctx.roots.push_frame(3);
    let sym = scope.slot(0);
    let val_form = scope.slot(1);
    let val = scope.slot(2);
    sym.set(require_symbol(args.get().car(), "define")?);
    val_form.set(args.get().cdr().car());
    val.set(eval::eval(ctx, env, &val_form)?);
    env::define(ctx.heap, ctx.roots, env, &sym, &val)?;
    Ok(val.get())
}

/// `(defun name (params…) body…)`: sugar for `(define name (lambda …))`.
pub fn defun(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_min("defun", list_len(args.get()), 3)?;
    make_named_closure(ctx, env, args, Tag::Function, "defun")
}

/// `(defmacro name (params…) body…)`: identical to `defun` except the
/// callable is tagged `Macro` (spec §4.7: "ordinary functions tagged as
/// macros").
pub fn defmacro(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_min("defmacro", list_len(args.get()), 3)?;
    make_named_closure(ctx, env, args, Tag::Macro, "defmacro")
}

fn make_named_closure(
    ctx: &mut Ctx,
    env: &Handle,
    args: &Handle,
    tag: Tag,
    form: &'static str,
) -> EvalResult<Value> {
    let scope = ctx.roots.push_frame(4);
    let name = scope.slot(0);
    let params = scope.slot(1);
    let body = scope.slot(2);
    let func = scope.slot(3);
    name.set(require_symbol(args.get().car(), form)?);
    params.set(args.get().cdr().car());
    body.set(args.get().cdr().cdr());
    func.set(ctx.heap.make_closure(ctx.roots, tag, &params, &body, env)?);
    env::define(ctx.heap, ctx.roots, env, &name, &func)?;
    Ok(func.get())
}

/// `(lambda (params…) body…)`: constructs a `Function` capturing `env`.
pub fn lambda(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_min("lambda", list_len(args.get()), 2)?;
    let scope = ctx.roots.push_frame(2);
    let params = scope.slot(0);
    let body = scope.slot(1);
    params.set(args.get().car());
    body.set(args.get().cdr());
    Ok(ctx.heap.make_closure(ctx.roots, Tag::Function, &params, &body, env)?)
}

/// `(macroexpand form)`: one step of macroexpansion, not followed by
/// evaluation of the result.
pub fn macroexpand(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_exact("macroexpand", list_len(args.get()), 1)?;
    let scope = ctx.roots.push_frame(4);
    let form = scope.slot(0);
    let head = scope.slot(1);
    let raw_args = scope.slot(2);
    let macro_val = scope.slot(3);
    form.set(args.get().car());
    let form_val = require_cell(form.get(), "macroexpand")?;
    head.set(form_val.car());
    raw_args.set(form_val.cdr());
    let head_sym = require_symbol(head.get(), "macroexpand")?;
    let cell = env::lookup(env.get(), head_sym)
        .ok_or_else(|| EvalError::Undefined(head_sym.symbol_name().to_string()))?;
    if cell.cdr().tag() != Tag::Macro {
        return Err(EvalError::WrongType {
            op: "macroexpand",
            expected: "a macro application",
        });
    }
    macro_val.set(cell.cdr());
    eval::expand_macro_once(ctx, &macro_val, &raw_args)
}

/// `(print e…)`: formats each evaluated argument through the host's
/// output sink, space-separated; returns the last evaluated value (spec
/// §4.7, §4.8 — streamed rather than built in a fixed buffer, per §9's
/// resolution of the original's buffer-overflow risk).
pub fn print(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_min("print", list_len(args.get()), 1)?;
    let scope = ctx.roots.push_frame(1);
    let evaluated = scope.slot(0);
    evaluated.set(eval::eval_list(ctx, env, args)?);
    let mut cur = evaluated.get();
    let mut last = Value::nil();
    let mut first = true;
    while !cur.is_nil() {
        if !first {
            (ctx.output)(" ");
        }
        first = false;
        let text = printer::print_to_string(cur.car());
        (ctx.output)(&text);
        last = cur.car();
        cur = cur.cdr();
    }
    Ok(last)
}

/// `(eval form)`: evaluates `form`, then evaluates the result.
pub fn eval_prim(ctx: &mut Ctx, env: &Handle, args: &Handle) -> EvalResult<Value> {
    require_arity_exact("eval", list_len(args.get()), 1)?;
    let scope = ctx.roots.push_frame(2);
    let form = scope.slot(0);
    let once = scope.slot(1);
    form.set(args.get().car());
    once.set(eval::eval(ctx, env, &form)?);
    eval::eval(ctx, env, &once)
}

//! C ABI surface (spec §6): exposes [`Interpreter`]'s lifecycle to
//! non-Rust hosts — the browser/WASM and microcontroller embedders
//! spec.md §1 names as external collaborators. Grounded in
//! `original_source/src/libminilisp.h`'s public surface and
//! `original_source/repl.c`'s `lisp_set_printers`/`lisp_create`/
//! `lisp_eval`/`lisp_destroy` call sequence, reconciled to the two-sink
//! `set_printers(out, err)` variant per spec.md §9.
//!
//! Every function here is `#[no_mangle] extern "C"`. The host only ever
//! holds the opaque `*mut MlispHandle` these functions hand out; nothing
//! about `Interpreter`'s Rust layout crosses the boundary.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int, c_longlong};
use std::ptr;

use mlisp_heap::Handle;

use crate::Interpreter;

/// Bundles the `Interpreter` with the one environment handle the C API
/// has any way to refer to — unlike the Rust API, there is no way to
/// hand a `Handle` across the FFI boundary, so C hosts only ever operate
/// on the single global environment `create` seeds.
pub struct MlispHandle {
    interpreter: Interpreter,
    env: Handle,
}

/// A print sink callback (spec §6: "each sink receives a NUL-terminated
/// message plus its length").
pub type MlispPrinter = extern "C" fn(*const c_char, usize);

/// The cooperative yield callback (spec §5).
pub type MlispYield = extern "C" fn();

/// `create(heap_bytes)`. Returns a null pointer if allocation fails.
#[no_mangle]
pub extern "C" fn mlisp_create(heap_bytes: usize) -> *mut MlispHandle {
    let mut interpreter = Interpreter::new();
    match interpreter.create(heap_bytes) {
        Ok(env) => Box::into_raw(Box::new(MlispHandle { interpreter, env })),
        Err(e) => {
            log::warn!("mlisp_create failed: {e}");
            ptr::null_mut()
        }
    }
}

/// `destroy()`. Consumes and frees `handle`; the pointer is invalid
/// after this call. A null `handle` is a no-op, matching the common C
/// convention for destructor-style functions.
///
/// # Safety
/// `handle` must be either null or a pointer previously returned by
/// [`mlisp_create`] and not already passed to `mlisp_destroy`.
#[no_mangle]
pub unsafe extern "C" fn mlisp_destroy(handle: *mut MlispHandle) {
    if handle.is_null() {
        return;
    }
    let mut boxed = Box::from_raw(handle);
    let _ = boxed.interpreter.destroy();
}

/// `is_created()`. Returns 0 or 1; a null `handle` reports 0.
///
/// # Safety
/// `handle` must be null or a live pointer from [`mlisp_create`].
#[no_mangle]
pub unsafe extern "C" fn mlisp_is_created(handle: *const MlispHandle) -> c_int {
    if handle.is_null() {
        return 0;
    }
    (*handle).interpreter.is_created() as c_int
}

/// `mem_used()`. Returns -1 on a null handle or a not-created
/// interpreter rather than panicking across the FFI boundary.
///
/// # Safety
/// `handle` must be null or a live pointer from [`mlisp_create`].
#[no_mangle]
pub unsafe extern "C" fn mlisp_mem_used(handle: *const MlispHandle) -> c_longlong {
    if handle.is_null() {
        return -1;
    }
    (*handle)
        .interpreter
        .mem_used()
        .map(|n| n as c_longlong)
        .unwrap_or(-1)
}

/// `error_index()`. Returns -1 if the last `eval_source` call succeeded
/// (or none has run yet).
///
/// # Safety
/// `handle` must be null or a live pointer from [`mlisp_create`].
#[no_mangle]
pub unsafe extern "C" fn mlisp_error_index(handle: *const MlispHandle) -> c_longlong {
    if handle.is_null() {
        return -1;
    }
    (*handle)
        .interpreter
        .error_index()
        .map(|n| n as c_longlong)
        .unwrap_or(-1)
}

/// `set_printers(out, err)`. Each Rust-side sink wraps its message in a
/// `CString` before handing it to the C callback, so `out`/`err` see the
/// NUL-terminated-plus-length contract spec.md §6 states for this
/// boundary even though the safe `Interpreter::set_printers` API (used
/// by Rust callers) just hands back a `&str`.
///
/// # Safety
/// `handle` must be a live pointer from [`mlisp_create`]. `out`/`err`
/// must be valid for the lifetime of `handle` (they are stored and
/// invoked by later `mlisp_eval_source`/`mlisp_run_task` calls).
#[no_mangle]
pub unsafe extern "C" fn mlisp_set_printers(handle: *mut MlispHandle, out: MlispPrinter, err: MlispPrinter) {
    if handle.is_null() {
        return;
    }
    (*handle).interpreter.set_printers(
        move |s: &str| {
            if let Ok(c) = CString::new(s) {
                out(c.as_ptr(), s.len());
            }
        },
        move |s: &str| {
            if let Ok(c) = CString::new(s) {
                err(c.as_ptr(), s.len());
            }
        },
    );
}

/// `set_cycle_yield(fn)`.
///
/// # Safety
/// `handle` must be a live pointer from [`mlisp_create`]. `f` must be
/// valid for the lifetime of `handle`.
#[no_mangle]
pub unsafe extern "C" fn mlisp_set_cycle_yield(handle: *mut MlispHandle, f: MlispYield) {
    if handle.is_null() {
        return;
    }
    (*handle).interpreter.set_cycle_yield(move || f());
}

/// `eval_source(env, text)`, against the single environment `create`
/// seeded. `text` must be a NUL-terminated, valid-UTF-8 C string.
/// Returns 0 on success, 1 if evaluation failed (the error having
/// already reached the error sink and `error_index()`), -1 if `handle`
/// or `text` was null or `text` wasn't valid UTF-8.
///
/// # Safety
/// `handle` must be null or a live pointer from [`mlisp_create`]. `text`
/// must be null or point to a valid NUL-terminated C string.
#[no_mangle]
pub unsafe extern "C" fn mlisp_eval_source(handle: *mut MlispHandle, text: *const c_char) -> c_int {
    if handle.is_null() || text.is_null() {
        return -1;
    }
    let handle = &mut *handle;
    let text = match CStr::from_ptr(text).to_str() {
        Ok(s) => s,
        Err(_) => return -1,
    };
    let env = handle.env.clone();
    match handle.interpreter.eval_source(&env, text) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// The `task` primitive's host-facing half (spec §5.1). Returns 0 on
/// success, 1 if a pass failed, -1 on a null/invalid argument.
///
/// # Safety
/// Same requirements as [`mlisp_eval_source`], applied to `body`.
#[no_mangle]
pub unsafe extern "C" fn mlisp_run_task(handle: *mut MlispHandle, times: c_longlong, body: *const c_char) -> c_int {
    if handle.is_null() || body.is_null() {
        return -1;
    }
    let handle = &mut *handle;
    let body = match CStr::from_ptr(body).to_str() {
        Ok(s) => s,
        Err(_) => return -1,
    };
    let env = handle.env.clone();
    match handle.interpreter.run_task(&env, times as i64, body) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

/// Host-settable cancellation flag (spec §5), checked once per `task`
/// pass.
///
/// # Safety
/// `handle` must be null or a live pointer from [`mlisp_create`].
#[no_mangle]
pub unsafe extern "C" fn mlisp_request_stop(handle: *const MlispHandle) {
    if handle.is_null() {
        return;
    }
    (*handle).interpreter.request_stop();
}

//! The `task` loop's iteration cap (spec §5.1, §2.3): `PrimitiveFn` is a
//! bare `fn` pointer with no room for captures, so the loop that drives a
//! `task`'s repeated passes can't live inside the primitive dispatch table
//! the way `while` does. `Interpreter::run_task` drives the loop directly
//! by re-invoking `eval_source`; `TaskLoop` is only the cap check, grounded
//! in `original_source/wasm.c`'s `attach_task` counting `times` down to
//! zero (or running forever for the `-1` sentinel) and `MAX_LOOP_ITERATIONS`
//! in `original_source/src/libminilisp.h`.

use mlisp_eval::EvalError;

use crate::error::{RuntimeError, RuntimeResult};

/// Unbounded task loops (the C `times == -1` sentinel, spec §5.1) still
/// have to stop somewhere when the host never cancels them; they're
/// checked against the same cap as bounded ones.
pub struct TaskLoop {
    max_iterations: u32,
}

impl TaskLoop {
    pub fn new(max_iterations: u32) -> Self {
        TaskLoop { max_iterations }
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// Called once per pass with the number of passes completed so far
    /// (0-based, i.e. before incrementing for the pass about to run).
    /// Errors once `iterations` reaches the cap.
    pub fn check(&self, iterations: u32) -> RuntimeResult<()> {
        if iterations >= self.max_iterations {
            return Err(RuntimeError::Eval(EvalError::TaskLimitExceeded));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn under_the_cap_is_fine() {
        let loop_ = TaskLoop::new(10);
        for i in 0..10 {
            assert!(loop_.check(i).is_ok());
        }
    }

    #[test]
    fn at_the_cap_is_an_error() {
        let loop_ = TaskLoop::new(10);
        let err = loop_.check(10).unwrap_err();
        assert!(matches!(err, RuntimeError::Eval(EvalError::TaskLimitExceeded)));
    }

    #[test]
    fn max_iterations_reports_the_configured_cap() {
        assert_eq!(TaskLoop::new(9999).max_iterations(), 9999);
    }
}

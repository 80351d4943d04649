//! Task loop configuration (spec §5, §2.3): bounds the `task` primitive's
//! bookkeeping the same way `HeapConfig` bounds allocation — a small,
//! `Default`-able struct the embedding layer constructs once.

/// Caps how many iterations a host-driven `task` loop may run before the
/// interpreter refuses to continue (spec §5: "A host-configurable task
/// iteration limit (default 9999)").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskConfig {
    pub max_iterations: u32,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            max_iterations: 9999,
        }
    }
}

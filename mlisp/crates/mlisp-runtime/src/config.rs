//! Bundles the heap and task-loop configuration `create()` needs into one
//! value, the way a single config struct is handed to a runtime's
//! constructor rather than threading each knob through separately.

use mlisp_eval::TaskConfig;
use mlisp_heap::HeapConfig;

#[derive(Debug, Clone)]
pub struct InterpreterConfig {
    pub heap: HeapConfig,
    pub task: TaskConfig,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            heap: HeapConfig::default(),
            task: TaskConfig::default(),
        }
    }
}

impl InterpreterConfig {
    /// `create(heap_bytes)` (spec §6): the one knob the external interface
    /// exposes directly, everything else defaulted.
    pub fn with_heap_bytes(heap_bytes: usize) -> Self {
        InterpreterConfig {
            heap: HeapConfig {
                size_bytes: heap_bytes,
                ..HeapConfig::default()
            },
            task: TaskConfig::default(),
        }
    }
}

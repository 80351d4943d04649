//! Error Module - Heap and Collector Error Types
//!
//! Defines all error types raised by allocation, root registration, and
//! the collector itself.

use thiserror::Error;

/// Main error type for all heap operations.
#[derive(Debug, Error)]
pub enum HeapError {
    #[error("out of memory: requested {requested} bytes, {available} available after collection")]
    OutOfMemory { requested: usize, available: usize },

    #[error("garbage collector invoked while already running")]
    ReentrantCollection,

    #[error("object size {size} is not a multiple of pointer alignment")]
    Misaligned { size: usize },

    #[error("internal error: {0}")]
    Internal(String),
}

impl HeapError {
    /// Whether retrying the operation with a larger heap could succeed.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HeapError::OutOfMemory { .. })
    }

    /// Whether this error indicates a bug in the collector or its caller
    /// rather than ordinary resource exhaustion.
    pub fn is_bug(&self) -> bool {
        matches!(
            self,
            HeapError::ReentrantCollection | HeapError::Misaligned { .. } | HeapError::Internal(_)
        )
    }
}

/// Result type alias for heap operations.
pub type Result<T> = std::result::Result<T, HeapError>;

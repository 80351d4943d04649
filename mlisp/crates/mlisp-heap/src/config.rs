//! Configuration Module - Heap Sizing and Debug Switches
//!
//! A single fixed-size semispace backs the whole interpreter; this module
//! holds its size and the two debug switches the evaluator consults on
//! every allocation.

use crate::error::HeapError;

/// Smallest semispace size considered sensible. Below this, almost any
/// real program immediately triggers back-to-back collections.
pub const MIN_SENSIBLE_SIZE: usize = 2000;

/// Default semispace size in bytes, matching the reference interpreter.
pub const DEFAULT_SIZE: usize = 4000;

/// Configuration for one [`crate::Heap`] instance.
///
/// # Examples
///
/// ```
/// use mlisp_heap::HeapConfig;
///
/// let config = HeapConfig::default();
/// assert!(config.validate().is_ok());
///
/// let config = HeapConfig {
///     size_bytes: 65536,
///     always_gc: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HeapConfig {
    /// Size in bytes of each semispace. The interpreter therefore commits
    /// `2 * size_bytes` total.
    pub size_bytes: usize,

    /// Force a full collection on every allocation. Used by tests to
    /// surface latent root-registration bugs that would otherwise only
    /// manifest once the heap happens to fill up.
    pub always_gc: bool,

    /// Emit a per-cycle summary (objects scanned, bytes reclaimed) through
    /// the `log` crate at debug level.
    pub debug_gc: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            size_bytes: DEFAULT_SIZE,
            always_gc: false,
            debug_gc: false,
        }
    }
}

impl HeapConfig {
    /// Validate the configuration, rejecting sizes too small to hold even
    /// a handful of cells without thrashing.
    pub fn validate(&self) -> Result<(), HeapError> {
        if self.size_bytes < MIN_SENSIBLE_SIZE {
            return Err(HeapError::Internal(format!(
                "size_bytes must be >= {MIN_SENSIBLE_SIZE}, got {}",
                self.size_bytes
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(HeapConfig::default().validate().is_ok());
    }

    #[test]
    fn tiny_size_rejected() {
        let config = HeapConfig {
            size_bytes: 16,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

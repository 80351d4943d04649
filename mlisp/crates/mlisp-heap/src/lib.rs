//! # mlisp-heap - Object Model, Arena, and Collector
//!
//! The tagged-value object model, bump-allocating semispace, shadow-stack
//! root registry, and Cheney two-space copying collector behind the
//! interpreter's heap (spec §3–§4.3). This crate owns exactly one kind of
//! memory: the two semispaces backing a single interpreter instance. It
//! knows nothing about symbols being interned, environments being
//! extended, or what a primitive does — those are `mlisp-eval`'s job,
//! built on the handful of tagged object shapes this crate exposes.
//!
//! ## Why a shadow stack
//!
//! The collector moves objects, so every native reference that must
//! survive a call that might allocate has to go through [`roots`] rather
//! than be held as a bare `Value` on the Rust call stack (design note in
//! spec §9: reimplementations in an unmanaged language should use an
//! explicit frame object with scoped, RAII-style acquisition). `Value`
//! itself carries no lifetime, so nothing in the type system stops a
//! caller from holding one across an allocating call without rooting it
//! first — that discipline is this crate's one real safety contract, the
//! same one the C original enforces by convention rather than by the
//! compiler.
//!
//! ## Modules
//!
//! - [`object`]: tags, headers, and the `Value` handle type.
//! - [`alloc`]: the bump allocator for a single semispace.
//! - [`roots`]: the shadow stack (`RootStack`, `RootFrameScope`, `Handle`).
//! - [`gc`]: `Heap`, the collector, and the object constructors.
//! - [`config`]: `HeapConfig`.
//! - [`error`]: `HeapError`.
//! - [`logging`]: structured per-cycle summaries.

mod alloc;
pub mod config;
pub mod error;
pub mod gc;
pub mod logging;
pub mod object;
pub mod roots;

pub use config::HeapConfig;
pub use error::{HeapError, Result};
pub use gc::Heap;
pub use logging::GcCycleSummary;
pub use object::{Tag, Value, SYMBOL_MAX_LEN};
pub use roots::{Handle, RootFrameScope, RootStack};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_starts_empty() {
        let heap = Heap::new(HeapConfig::default()).unwrap();
        assert_eq!(heap.mem_used(), 0);
    }
}

//! GC Core Module - Cheney's Two-Space Copying Collector
//!
//! This is the whole of spec §4.3: one semispace is active at a time,
//! allocation bumps a cursor in it, and a full collection walks every root,
//! copies what's reachable into a fresh semispace, and discards the rest —
//! no mark phase, no free list, no generations.

use crate::alloc::{align_up, Arena, ALIGNMENT};
use crate::config::HeapConfig;
use crate::error::{HeapError, Result};
use crate::logging::GcCycleSummary;
use crate::object::{MovedPayload, ObjHeader, Tag, Value};
use crate::roots::{Handle, RootStack};

/// Owns the pair of semispaces and the bump cursor into whichever one is
/// currently active. One `Heap` is created per interpreter instance.
pub struct Heap {
    config: HeapConfig,
    active: Arena,
    collecting: bool,
    cycles: u64,
}

fn object_size(payload_size: usize) -> usize {
    let raw = ObjHeader::HEADER_SIZE + payload_size;
    let min = ObjHeader::HEADER_SIZE + std::mem::size_of::<MovedPayload>();
    align_up(raw.max(min), ALIGNMENT)
}

impl Heap {
    pub fn new(config: HeapConfig) -> Result<Self> {
        config.validate()?;
        let active = Arena::new(config.size_bytes);
        Ok(Heap {
            config,
            active,
            collecting: false,
            cycles: 0,
        })
    }

    /// Bytes consumed in the active semispace, for the embedding API's
    /// `mem_used()` (spec §6).
    pub fn mem_used(&self) -> usize {
        self.active.free
    }

    pub fn capacity(&self) -> usize {
        self.active.capacity()
    }

    pub fn always_gc(&self) -> bool {
        self.config.always_gc
    }

    fn ensure_space(&mut self, roots: &RootStack, payload_size: usize) -> Result<()> {
        let needed = object_size(payload_size);
        if self.config.always_gc {
            self.collect(roots)?;
        }
        if self.active.remaining() >= needed {
            return Ok(());
        }
        self.collect(roots)?;
        if self.active.remaining() >= needed {
            Ok(())
        } else {
            Err(HeapError::OutOfMemory {
                requested: needed,
                available: self.active.remaining(),
            })
        }
    }

    pub fn make_int(&mut self, roots: &RootStack, n: i64) -> Result<Value> {
        self.ensure_space(roots, std::mem::size_of::<i64>())?;
        let v = self
            .active
            .try_alloc(Tag::Int, object_size(std::mem::size_of::<i64>()))
            .expect("space ensured above");
        unsafe {
            *(v.payload_ptr() as *mut i64) = n;
        }
        Ok(v)
    }

    pub fn cons(&mut self, roots: &RootStack, car: &Handle, cdr: &Handle) -> Result<Value> {
        let payload_size = 2 * std::mem::size_of::<Value>();
        self.ensure_space(roots, payload_size)?;
        let v = self
            .active
            .try_alloc(Tag::Cell, object_size(payload_size))
            .expect("space ensured above");
        v.set_car(car.get());
        v.set_cdr(cdr.get());
        Ok(v)
    }

    /// Allocates a symbol object inline-storing `name`. `mlisp-eval` is
    /// responsible for interning (scanning the obarray before calling
    /// this); the heap itself does not deduplicate.
    pub fn make_symbol(&mut self, roots: &RootStack, name: &str) -> Result<Value> {
        debug_assert!(
            name.len() <= crate::object::SYMBOL_MAX_LEN,
            "symbol name length must be checked by the reader before this call"
        );
        let payload_size = 2 + name.len();
        self.ensure_space(roots, payload_size)?;
        let v = self
            .active
            .try_alloc(Tag::Symbol, object_size(payload_size))
            .expect("space ensured above");
        unsafe {
            let base = v.payload_ptr();
            *(base as *mut u16) = name.len() as u16;
            std::ptr::copy_nonoverlapping(name.as_ptr(), base.add(2), name.len());
        }
        Ok(v)
    }

    /// Allocates a `Primitive` object carrying an opaque id. The mapping
    /// from id to native function lives in `mlisp-eval`'s dispatch table.
    pub fn make_primitive(&mut self, roots: &RootStack, id: u32) -> Result<Value> {
        self.ensure_space(roots, std::mem::size_of::<u32>())?;
        let v = self
            .active
            .try_alloc(Tag::Primitive, object_size(std::mem::size_of::<u32>()))
            .expect("space ensured above");
        unsafe {
            *(v.payload_ptr() as *mut u32) = id;
        }
        Ok(v)
    }

    /// Allocates a `Function` or `Macro` object. `tag` must be one of
    /// those two.
    pub fn make_closure(
        &mut self,
        roots: &RootStack,
        tag: Tag,
        params: &Handle,
        body: &Handle,
        env: &Handle,
    ) -> Result<Value> {
        debug_assert!(matches!(tag, Tag::Function | Tag::Macro));
        let payload_size = 3 * std::mem::size_of::<Value>();
        self.ensure_space(roots, payload_size)?;
        let v = self
            .active
            .try_alloc(tag, object_size(payload_size))
            .expect("space ensured above");
        v.set_params(params.get());
        v.set_body(body.get());
        v.set_closure_env(env.get());
        Ok(v)
    }

    pub fn make_env(&mut self, roots: &RootStack, vars: &Handle, up: &Handle) -> Result<Value> {
        let payload_size = 2 * std::mem::size_of::<Value>();
        self.ensure_space(roots, payload_size)?;
        let v = self
            .active
            .try_alloc(Tag::Env, object_size(payload_size))
            .expect("space ensured above");
        v.set_vars(vars.get());
        v.set_up(up.get());
        Ok(v)
    }

    /// Runs one full collection cycle. Asserts non-reentrancy (spec §4.3:
    /// "GC is non-reentrant").
    pub fn collect(&mut self, roots: &RootStack) -> Result<GcCycleSummary> {
        if self.collecting {
            return Err(HeapError::ReentrantCollection);
        }
        self.collecting = true;
        let before = self.active.free;

        let mut to_space = Arena::new(self.config.size_bytes);
        {
            let from = &self.active;
            roots.forward_all(|v| forward(from, &mut to_space, v));
        }
        scan_to_space(&self.active, &mut to_space);

        self.cycles += 1;
        let summary = GcCycleSummary {
            cycle: self.cycles,
            bytes_before: before,
            bytes_live: to_space.free,
        };
        if self.config.debug_gc {
            log::debug!(
                "gc: cycle {} reclaimed {} of {} bytes, {} bytes now live",
                summary.cycle,
                summary.bytes_reclaimed(),
                summary.bytes_before,
                summary.bytes_live
            );
        }
        self.active = to_space;
        self.collecting = false;
        Ok(summary)
    }
}

/// Forwards a single reference: singletons and values already in to-space
/// pass through unchanged; a from-space object not yet moved is copied and
/// left behind as a `Moved` tombstone; a from-space object already moved
/// (tagged `Moved`) yields its recorded forwarding address.
fn forward(from: &Arena, to: &mut Arena, v: Value) -> Value {
    if !from.contains(v) {
        return v;
    }
    if v.tag() == Tag::Moved {
        return v.moved_forward();
    }
    let size = v.size();
    let new_addr = to.copy_object(v, size);
    v.write_tombstone(new_addr);
    new_addr
}

/// Walks to-space from its start to its (advancing) free cursor, forwarding
/// each object's internal references according to its tag (spec §4.3).
fn scan_to_space(from: &Arena, to: &mut Arena) {
    let mut scan = 0usize;
    while scan < to.free {
        let obj = to.value_at(scan);
        let size = obj.size();
        match obj.tag() {
            Tag::Cell => {
                let car = forward(from, to, obj.car());
                obj.set_car(car);
                let cdr = forward(from, to, obj.cdr());
                obj.set_cdr(cdr);
            }
            Tag::Function | Tag::Macro => {
                let params = forward(from, to, obj.params());
                obj.set_params(params);
                let body = forward(from, to, obj.body());
                obj.set_body(body);
                let env = forward(from, to, obj.closure_env());
                obj.set_closure_env(env);
            }
            Tag::Env => {
                let vars = forward(from, to, obj.vars());
                obj.set_vars(vars);
                let up = forward(from, to, obj.up());
                obj.set_up(up);
            }
            Tag::Int | Tag::Symbol | Tag::Primitive => {}
            Tag::Moved => unreachable!("a tombstone must never be copied into to-space"),
            Tag::True | Tag::Nil | Tag::Dot | Tag::Cparen => {
                unreachable!("singletons are never arena-resident")
            }
        }
        scan += size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeapConfig;

    #[test]
    fn allocation_past_capacity_triggers_collection_not_error() {
        let mut heap = Heap::new(HeapConfig {
            size_bytes: 2000,
            ..Default::default()
        })
        .unwrap();
        let roots = RootStack::new();
        let scope = roots.push_frame(1);
        let cell = scope.slot(0);
        for i in 0..500 {
            let v = heap.make_int(&roots, i).unwrap();
            cell.set(v);
        }
        assert!(heap.mem_used() <= heap.capacity());
    }

    #[test]
    fn cons_survives_a_collection_triggered_by_always_gc() {
        let mut heap = Heap::new(HeapConfig {
            always_gc: true,
            ..Default::default()
        })
        .unwrap();
        let roots = RootStack::new();
        let scope = roots.push_frame(3);
        let a = scope.slot(0);
        let b = scope.slot(1);
        let pair = scope.slot(2);

        a.set(heap.make_int(&roots, 1).unwrap());
        b.set(heap.make_int(&roots, 2).unwrap());
        pair.set(heap.cons(&roots, &a, &b).unwrap());

        let p = pair.get();
        assert_eq!(p.car().as_int(), Some(1));
        assert_eq!(p.cdr().as_int(), Some(2));
    }

    #[test]
    fn reentrant_collection_is_rejected() {
        let mut heap = Heap::new(HeapConfig::default()).unwrap();
        heap.collecting = true;
        let roots = RootStack::new();
        assert!(matches!(
            heap.collect(&roots),
            Err(HeapError::ReentrantCollection)
        ));
    }
}

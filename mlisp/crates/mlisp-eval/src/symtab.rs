//! Symbol Table - the obarray (spec §4.5).
//!
//! A globally rooted cons-list of interned `Symbol` values. `intern`
//! scans it linearly for a name match (the list is rarely more than a few
//! hundred entries for a program this language is meant to run, so a hash
//! index would be solving a problem this interpreter doesn't have) and
//! returns the existing symbol, or allocates a new one and prepends it.
//! The list's head lives in a permanent root slot (spec §3: "Every symbol
//! observable to user code is present in the global symbol list" and "The
//! symbol table ... [is] registered as roots and therefore live for the
//! lifetime of the interpreter").

use mlisp_heap::{Handle, Heap, RootStack, Value};

pub struct SymbolTable {
    head: Handle,
    gensym_counter: u64,
}

impl SymbolTable {
    pub fn new(roots: &RootStack) -> Self {
        let mut slots = roots.permanent_frame(1);
        let head = slots.remove(0);
        head.set(Value::nil());
        SymbolTable {
            head,
            gensym_counter: 0,
        }
    }

    /// Returns the existing symbol named `name`, interning a new one if
    /// none exists yet (spec §4.5).
    pub fn intern(&mut self, heap: &mut Heap, roots: &RootStack, name: &str) -> mlisp_heap::Result<Value> {
        let mut cur = self.head.get();
        while !cur.is_nil() {
            let sym = cur.car();
            if sym.symbol_name() == name {
                return Ok(sym);
            }
            cur = cur.cdr();
        }

        let scope = roots.push_frame(2);
        let sym = scope.slot(0);
        let rest = scope.slot(1);
        sym.set(heap.make_symbol(roots, name)?);
        rest.set(self.head.get());
        let new_head = heap.cons(roots, &sym, &rest)?;
        self.head.set(new_head);
        log::trace!("interned new symbol `{name}`");
        Ok(sym.get())
    }

    /// `(gensym)`: a fresh, uninterned symbol `G__N` (spec §4.7). It is
    /// never added to the obarray, so no later `intern` call of the same
    /// name can ever produce the same object — two gensyms are never `eq`
    /// (spec testable property 2) even though nothing stops a user from
    /// reading one back by name; they simply can't, since the obarray is
    /// the only way `intern` manufactures symbols from text.
    pub fn gensym(&mut self, heap: &mut Heap, roots: &RootStack) -> mlisp_heap::Result<Value> {
        let n = self.gensym_counter;
        self.gensym_counter += 1;
        heap.make_symbol(roots, &format!("G__{n}"))
    }
}

impl mlisp_reader::Interner for SymbolTable {
    fn intern(&mut self, heap: &mut Heap, roots: &RootStack, name: &str) -> mlisp_heap::Result<Value> {
        SymbolTable::intern(self, heap, roots, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlisp_heap::HeapConfig;

    fn setup() -> (Heap, RootStack, SymbolTable) {
        let heap = Heap::new(HeapConfig::default()).unwrap();
        let roots = RootStack::new();
        let symtab = SymbolTable::new(&roots);
        (heap, roots, symtab)
    }

    #[test]
    fn interning_the_same_name_twice_returns_the_same_object() {
        let (mut heap, roots, mut symtab) = setup();
        let a = symtab.intern(&mut heap, &roots, "foo").unwrap();
        let b = symtab.intern(&mut heap, &roots, "foo").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_names_intern_to_distinct_objects() {
        let (mut heap, roots, mut symtab) = setup();
        let a = symtab.intern(&mut heap, &roots, "foo").unwrap();
        let b = symtab.intern(&mut heap, &roots, "bar").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn two_gensyms_are_never_eq() {
        let (mut heap, roots, mut symtab) = setup();
        let a = symtab.gensym(&mut heap, &roots).unwrap();
        let b = symtab.gensym(&mut heap, &roots).unwrap();
        assert_ne!(a, b);
        assert_ne!(a.symbol_name(), b.symbol_name());
    }

    #[test]
    fn interning_survives_a_collection() {
        let (mut heap, roots, mut symtab) = setup();
        let foo = symtab.intern(&mut heap, &roots, "foo").unwrap();
        heap.collect(&roots).unwrap();
        let foo_again = symtab.intern(&mut heap, &roots, "foo").unwrap();
        assert_eq!(foo_again.symbol_name(), "foo");
        let _ = foo;
    }
}

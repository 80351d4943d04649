//! Reader benchmarks.
//!
//! Run with: `cargo bench --package mlisp-reader`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mlisp_heap::{Heap, HeapConfig, RootStack, Value};
use mlisp_reader::{Interner, Reader};

#[derive(Default)]
struct BenchInterner {
    entries: Vec<(String, Value)>,
}

impl Interner for BenchInterner {
    fn intern(&mut self, heap: &mut Heap, roots: &RootStack, name: &str) -> mlisp_heap::Result<Value> {
        if let Some((_, v)) = self.entries.iter().find(|(n, _)| n == name) {
            return Ok(*v);
        }
        let v = heap.make_symbol(roots, name)?;
        self.entries.push((name.to_string(), v));
        Ok(v)
    }
}

fn read_all(source: &str) {
    let mut heap = Heap::new(HeapConfig {
        size_bytes: 1 << 20,
        ..Default::default()
    })
    .unwrap();
    let roots = RootStack::new();
    let mut interner = BenchInterner::default();
    let mut reader = Reader::new(source);
    while reader.read(&mut heap, &roots, &mut interner).unwrap().is_some() {}
}

fn bench_reader_atoms(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_atoms");
    let source = "1 2 3 foo bar -4 baz 5 qux";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("atoms", |b| b.iter(|| read_all(black_box(source))));
    group.finish();
}

fn bench_reader_nested_lists(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_nested_lists");
    let source = "(define fact (lambda (n) (if (= n 0) 1 (* n (fact (- n 1))))))";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nested_lists", |b| b.iter(|| read_all(black_box(source))));
    group.finish();
}

fn bench_reader_long_flat_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_long_flat_list");
    let mut source = String::from("(list");
    for i in 0..500 {
        source.push(' ');
        source.push_str(&i.to_string());
    }
    source.push(')');
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("long_flat_list", |b| b.iter(|| read_all(black_box(&source))));
    group.finish();
}

fn bench_reader_quote_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("reader_quote_chains");
    let source = "''''''''''x";
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("quote_chains", |b| b.iter(|| read_all(black_box(source))));
    group.finish();
}

criterion_group!(
    benches,
    bench_reader_atoms,
    bench_reader_nested_lists,
    bench_reader_long_flat_list,
    bench_reader_quote_chains
);
criterion_main!(benches);

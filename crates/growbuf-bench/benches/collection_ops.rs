//! Criterion micro-benchmarks for the stack and queue adapters.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use growbuf_collections::{Queue, Stack};

/// Benchmark: push 1K then pop 1K.
fn bench_stack_round_trip_1k(c: &mut Criterion) {
    c.bench_function("stack_round_trip_1k", |b| {
        b.iter(|| {
            let mut stack = Stack::new();
            for v in 0..1_000u32 {
                stack.push(v).unwrap();
            }
            while let Ok(v) = stack.pop() {
                black_box(v);
            }
        });
    });
}

/// Benchmark: enqueue 1K then dequeue 1K (dequeue shifts, so O(n^2) total).
fn bench_queue_round_trip_1k(c: &mut Criterion) {
    c.bench_function("queue_round_trip_1k", |b| {
        b.iter(|| {
            let mut queue = Queue::new();
            for v in 0..1_000u32 {
                queue.enqueue(v).unwrap();
            }
            while let Ok(v) = queue.dequeue() {
                black_box(v);
            }
        });
    });
}

criterion_group!(benches, bench_stack_round_trip_1k, bench_queue_round_trip_1k);
criterion_main!(benches);
